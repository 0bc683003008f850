/// Like handlers for blogs and workouts. Creates are intentionally not
/// idempotent; a duplicate surfaces as Conflict from the unique pair.
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::Pagination;
use crate::middleware::permissions::{enforce, OwnerOrReadOnly};
use crate::middleware::Actor;

#[derive(Debug, Deserialize)]
pub struct CreateBlogLikeRequest {
    pub blog: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkoutLikeRequest {
    pub workout: i64,
}

pub async fn create_blog_like(
    pool: web::Data<PgPool>,
    actor: Actor,
    req: web::Json<CreateBlogLikeRequest>,
) -> Result<HttpResponse> {
    let like = db::likes::create_blog_like(&pool, actor.id, req.blog).await?;
    Ok(HttpResponse::Created().json(like))
}

pub async fn list_blog_likes(
    pool: web::Data<PgPool>,
    _actor: Actor,
    page: web::Query<Pagination>,
) -> Result<HttpResponse> {
    let likes = db::likes::list_blog_likes(&pool, page.limit(), page.offset()).await?;
    Ok(HttpResponse::Ok().json(likes))
}

pub async fn get_blog_like(
    pool: web::Data<PgPool>,
    _actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let like = db::likes::find_blog_like(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("like not found".to_string()))?;
    Ok(HttpResponse::Ok().json(like))
}

pub async fn delete_blog_like(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
) -> Result<HttpResponse> {
    let like_id = path.into_inner();
    let like = db::likes::find_blog_like(&pool, like_id)
        .await?
        .ok_or_else(|| AppError::NotFound("like not found".to_string()))?;

    enforce(&OwnerOrReadOnly, http_req.method(), &actor, like.owner_id)?;

    db::likes::delete_blog_like(&pool, like_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn create_workout_like(
    pool: web::Data<PgPool>,
    actor: Actor,
    req: web::Json<CreateWorkoutLikeRequest>,
) -> Result<HttpResponse> {
    let like = db::likes::create_workout_like(&pool, actor.id, req.workout).await?;
    Ok(HttpResponse::Created().json(like))
}

pub async fn list_workout_likes(
    pool: web::Data<PgPool>,
    _actor: Actor,
    page: web::Query<Pagination>,
) -> Result<HttpResponse> {
    let likes = db::likes::list_workout_likes(&pool, page.limit(), page.offset()).await?;
    Ok(HttpResponse::Ok().json(likes))
}

pub async fn get_workout_like(
    pool: web::Data<PgPool>,
    _actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let like = db::likes::find_workout_like(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("like not found".to_string()))?;
    Ok(HttpResponse::Ok().json(like))
}

pub async fn delete_workout_like(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
) -> Result<HttpResponse> {
    let like_id = path.into_inner();
    let like = db::likes::find_workout_like(&pool, like_id)
        .await?
        .ok_or_else(|| AppError::NotFound("like not found".to_string()))?;

    enforce(&OwnerOrReadOnly, http_req.method(), &actor, like.owner_id)?;

    db::likes::delete_workout_like(&pool, like_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
