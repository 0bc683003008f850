/// Media upload endpoint. The path segment names the upload kind, which
/// pins the dimension envelope; the body is a multipart form with one
/// image field.
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::middleware::Actor;
use crate::services::media::{self, ImageKind, MediaStorage, MAX_IMAGE_BYTES};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

pub async fn upload(
    storage: web::Data<MediaStorage>,
    actor: Actor,
    path: web::Path<String>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let kind = ImageKind::from_path(&path.into_inner())
        .ok_or_else(|| AppError::NotFound("unknown upload kind".to_string()))?;

    let mut field = payload
        .try_next()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {e}")))?
        .ok_or_else(|| AppError::BadRequest("missing image field".to_string()))?;

    let filename = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .unwrap_or("upload.png")
        .to_string();

    // Reject oversized bodies while streaming rather than after buffering
    // the whole thing.
    let mut data: Vec<u8> = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if data.len() + chunk.len() > MAX_IMAGE_BYTES + 1 {
            return Err(AppError::ValidationError(
                "Image size is larger than 2 MB, please try uploading a smaller image.".to_string(),
            ));
        }
        data.extend_from_slice(&chunk);
    }

    media::validate_image(kind, &data)?;

    let url = storage.store(&data, &filename).await?;

    tracing::info!(user_id = actor.id, %url, "image uploaded");

    Ok(HttpResponse::Created().json(UploadResponse { url }))
}
