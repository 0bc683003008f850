/// Follower graph handlers
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::Pagination;
use crate::middleware::permissions::{enforce, OwnerOrReadOnly};
use crate::middleware::Actor;
use crate::models::FollowRow;

#[derive(Debug, Deserialize)]
pub struct CreateFollowRequest {
    pub followed: i64,
}

#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub id: i64,
    pub owner: String,
    pub followed: i64,
    pub followed_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<FollowRow> for FollowResponse {
    fn from(row: FollowRow) -> Self {
        Self {
            id: row.id,
            owner: row.owner_username,
            followed: row.followed_id,
            followed_name: row.followed_name,
            created_at: row.created_at,
        }
    }
}

/// A follow edge must point at somebody else.
fn check_follow_target(owner_id: i64, followed_id: i64) -> Result<()> {
    if owner_id == followed_id {
        return Err(AppError::ValidationError(
            "You cannot follow yourself".to_string(),
        ));
    }
    Ok(())
}

/// Follow another user. Following yourself is rejected up front; the
/// unique pair constraint turns a duplicate into Conflict.
pub async fn create_follow(
    pool: web::Data<PgPool>,
    actor: Actor,
    req: web::Json<CreateFollowRequest>,
) -> Result<HttpResponse> {
    check_follow_target(actor.id, req.followed)?;

    let row = db::follows::create_follow(&pool, actor.id, req.followed).await?;

    tracing::info!(owner_id = actor.id, followed_id = req.followed, "follow created");

    Ok(HttpResponse::Created().json(FollowResponse::from(row)))
}

pub async fn list_follows(
    pool: web::Data<PgPool>,
    _actor: Actor,
    page: web::Query<Pagination>,
) -> Result<HttpResponse> {
    let rows = db::follows::list_follows(&pool, page.limit(), page.offset()).await?;
    let follows: Vec<FollowResponse> = rows.into_iter().map(FollowResponse::from).collect();

    Ok(HttpResponse::Ok().json(follows))
}

pub async fn get_follow(
    pool: web::Data<PgPool>,
    _actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let follow_id = path.into_inner();
    let row = db::follows::find_follow(&pool, follow_id)
        .await?
        .ok_or_else(|| AppError::NotFound("follow not found".to_string()))?;

    Ok(HttpResponse::Ok().json(FollowResponse::from(row)))
}

pub async fn delete_follow(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
) -> Result<HttpResponse> {
    let follow_id = path.into_inner();
    let owner_id = db::follows::find_owner(&pool, follow_id)
        .await?
        .ok_or_else(|| AppError::NotFound("follow not found".to_string()))?;

    enforce(&OwnerOrReadOnly, http_req.method(), &actor, owner_id)?;

    db::follows::delete_follow(&pool, follow_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn following_yourself_is_rejected() {
        let err = check_follow_target(7, 7).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(err.to_string().contains("cannot follow yourself"));
    }

    #[test]
    fn following_somebody_else_passes() {
        assert!(check_follow_target(7, 8).is_ok());
    }
}
