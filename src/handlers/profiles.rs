/// Profile handlers
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::Pagination;
use crate::middleware::permissions::{enforce, OwnerOrReadOnly};
use crate::middleware::Actor;
use crate::models::ProfileRow;

#[derive(Debug, Deserialize)]
pub struct ProfileListQuery {
    pub ordering: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 150))]
    pub name: String,
    pub bio: String,
    pub display_name: bool,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub owner: String,
    pub is_owner: bool,
    pub name: String,
    pub bio: String,
    pub email: String,
    pub profile_image: String,
    pub cover_image: String,
    pub display_name: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub blogs_count: i64,
    pub workouts_count: i64,
    pub followers_count: i64,
    pub following_count: i64,
    pub following_id: Option<i64>,
}

impl ProfileResponse {
    pub fn from_row(row: ProfileRow, viewer_id: i64) -> Self {
        Self {
            id: row.id,
            owner: row.owner_username,
            is_owner: row.owner_id == viewer_id,
            name: row.name,
            bio: row.bio,
            email: row.email,
            profile_image: row.profile_image,
            cover_image: row.cover_image,
            display_name: row.display_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
            blogs_count: row.blogs_count,
            workouts_count: row.workouts_count,
            followers_count: row.followers_count,
            following_count: row.following_count,
            following_id: row.following_id,
        }
    }
}

pub async fn list_profiles(
    pool: web::Data<PgPool>,
    actor: Actor,
    query: web::Query<ProfileListQuery>,
    page: web::Query<Pagination>,
) -> Result<HttpResponse> {
    let order = db::profiles::order_clause(query.ordering.as_deref());
    let rows =
        db::profiles::list_profiles(&pool, actor.id, order, page.limit(), page.offset()).await?;

    let profiles: Vec<ProfileResponse> = rows
        .into_iter()
        .map(|row| ProfileResponse::from_row(row, actor.id))
        .collect();

    Ok(HttpResponse::Ok().json(profiles))
}

pub async fn get_profile(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let profile_id = path.into_inner();
    let row = db::profiles::find_profile(&pool, actor.id, profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ProfileResponse::from_row(row, actor.id)))
}

/// Update a profile; the email lives on the user record and is changed in
/// the same transaction.
pub async fn update_profile(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let profile_id = path.into_inner();
    let owner_id = db::profiles::find_owner(&pool, profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile not found".to_string()))?;

    enforce(&OwnerOrReadOnly, http_req.method(), &actor, owner_id)?;

    db::profiles::update_profile(
        &pool,
        profile_id,
        &req.name,
        &req.bio,
        req.display_name,
        req.profile_image.as_deref(),
        req.cover_image.as_deref(),
        req.email.as_deref(),
    )
    .await?;

    let row = db::profiles::find_profile(&pool, actor.id, profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ProfileResponse::from_row(row, actor.id)))
}
