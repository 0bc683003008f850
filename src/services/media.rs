//! Image envelope validation and filesystem-backed media storage.

use std::path::PathBuf;

use image::GenericImageView;
use tokio::fs;
use uuid::Uuid;

use crate::config::MediaConfig;
use crate::error::{AppError, Result};

pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Upload kind, taken from the request path. Each kind pins a dimension
/// envelope for the image it will be embedded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Banner,
    ContentImage,
    Logo,
    Avatar,
    Cover,
}

/// Accepted dimension range for one upload kind.
#[derive(Debug, Clone, Copy)]
pub struct ImageEnvelope {
    pub max_width: u32,
    pub max_height: u32,
    pub min_width: u32,
    pub min_height: u32,
}

impl ImageKind {
    pub fn from_path(kind: &str) -> Option<Self> {
        match kind {
            "banner" => Some(Self::Banner),
            "image" => Some(Self::ContentImage),
            "logo" => Some(Self::Logo),
            "avatar" => Some(Self::Avatar),
            "cover" => Some(Self::Cover),
            _ => None,
        }
    }

    pub fn envelope(self) -> ImageEnvelope {
        match self {
            Self::Banner => ImageEnvelope {
                max_width: 4096,
                max_height: 4096,
                min_width: 1200,
                min_height: 400,
            },
            Self::ContentImage | Self::Logo | Self::Cover => ImageEnvelope {
                max_width: 4096,
                max_height: 4096,
                min_width: 600,
                min_height: 400,
            },
            Self::Avatar => ImageEnvelope {
                max_width: 4096,
                max_height: 4096,
                min_width: 200,
                min_height: 200,
            },
        }
    }
}

/// Validate an uploaded image against the envelope for its kind.
///
/// Checks run in a fixed order and stop at the first violation: byte size,
/// max width, max height, min width, min height.
pub fn validate_image(kind: ImageKind, data: &[u8]) -> Result<()> {
    if data.len() > MAX_IMAGE_BYTES {
        return Err(AppError::ValidationError(
            "Image size is larger than 2 MB, please try uploading a smaller image.".to_string(),
        ));
    }

    let img = image::load_from_memory(data)
        .map_err(|_| AppError::ValidationError("Uploaded file is not a valid image.".to_string()))?;
    let (width, height) = img.dimensions();
    let env = kind.envelope();

    if width > env.max_width {
        return Err(AppError::ValidationError(format!(
            "Image width is larger than {} pixels, please upload a smaller image.",
            env.max_width
        )));
    }
    if height > env.max_height {
        return Err(AppError::ValidationError(format!(
            "Image height is larger than {} pixels, please upload a smaller image.",
            env.max_height
        )));
    }
    if width < env.min_width {
        return Err(AppError::ValidationError(format!(
            "Image width is smaller than {} pixels, please upload a larger image.",
            env.min_width
        )));
    }
    if height < env.min_height {
        return Err(AppError::ValidationError(format!(
            "Image height is smaller than {} pixels, please upload a larger image.",
            env.min_height
        )));
    }

    Ok(())
}

/// Filesystem-backed media store. Writes validated uploads under the
/// configured root and hands back the URL clients embed in content records.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    base_url: String,
}

impl MediaStorage {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Store validated image bytes and return their public URL.
    pub async fn store(&self, data: &[u8], original_filename: &str) -> Result<String> {
        let ext = std::path::Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png")
            .to_ascii_lowercase();
        let key = format!("{}.{}", Uuid::new_v4(), ext);

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::Internal(format!("failed to prepare media root: {e}")))?;

        let path = self.root.join(&key);
        fs::write(&path, data)
            .await
            .map_err(|e| AppError::Internal(format!("failed to persist upload: {e}")))?;

        Ok(format!("{}/{}", self.base_url, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_of(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(width, height);
        let mut buf = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut buf),
            image::ImageOutputFormat::Png,
        )
        .unwrap();
        buf
    }

    #[test]
    fn oversized_payload_is_rejected_before_decoding() {
        let data = vec![0u8; MAX_IMAGE_BYTES + 1];
        let err = validate_image(ImageKind::Banner, &data).unwrap_err();
        assert!(err
            .to_string()
            .contains("Image size is larger than 2 MB"));
    }

    #[test]
    fn banner_below_min_width_is_rejected() {
        let data = png_of(1199, 500);
        let err = validate_image(ImageKind::Banner, &data).unwrap_err();
        assert!(err
            .to_string()
            .contains("Image width is smaller than 1200 pixels"));
    }

    #[test]
    fn width_violation_reported_before_height() {
        // Both dimensions are under the minimum; the width message wins.
        let data = png_of(100, 100);
        let err = validate_image(ImageKind::ContentImage, &data).unwrap_err();
        assert!(err
            .to_string()
            .contains("Image width is smaller than 600 pixels"));
    }

    #[test]
    fn avatar_envelope_accepts_square_thumbnails() {
        let data = png_of(200, 200);
        assert!(validate_image(ImageKind::Avatar, &data).is_ok());
        let err = validate_image(ImageKind::ContentImage, &data).unwrap_err();
        assert!(err.to_string().contains("smaller than 600 pixels"));
    }

    #[test]
    fn garbage_bytes_are_not_an_image() {
        let err = validate_image(ImageKind::Avatar, b"not an image").unwrap_err();
        assert!(err.to_string().contains("not a valid image"));
    }
}
