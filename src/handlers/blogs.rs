/// Blog handlers
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::Pagination;
use crate::middleware::permissions::{enforce, OwnerOrReadOnly};
use crate::middleware::{Actor, MaybeActor};
use crate::models::BlogRow;

#[derive(Debug, Deserialize)]
pub struct BlogListQuery {
    pub ordering: Option<String>,
    pub search: Option<String>,
    pub owner: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BlogRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub content: String,
    pub banner: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub id: i64,
    pub owner: String,
    pub is_owner: bool,
    pub profile_id: i64,
    pub profile_image: String,
    pub title: String,
    pub content: String,
    pub banner: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub blog_likes_count: i64,
    pub blog_comments_count: i64,
    pub blog_like_id: Option<i64>,
}

impl BlogResponse {
    pub fn from_row(row: BlogRow, viewer_id: Option<i64>) -> Self {
        Self {
            id: row.id,
            owner: row.owner_username,
            is_owner: viewer_id == Some(row.owner_id),
            profile_id: row.profile_id,
            profile_image: row.profile_image,
            title: row.title,
            content: row.content,
            banner: row.banner,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
            blog_likes_count: row.blog_likes_count,
            blog_comments_count: row.blog_comments_count,
            blog_like_id: row.blog_like_id,
        }
    }
}

pub async fn list_blogs(
    pool: web::Data<PgPool>,
    viewer: MaybeActor,
    query: web::Query<BlogListQuery>,
    page: web::Query<Pagination>,
) -> Result<HttpResponse> {
    let order = db::blogs::order_clause(query.ordering.as_deref());
    let rows = db::blogs::list_blogs(
        &pool,
        viewer.id(),
        query.search.as_deref(),
        query.owner,
        order,
        page.limit(),
        page.offset(),
    )
    .await?;

    let blogs: Vec<BlogResponse> = rows
        .into_iter()
        .map(|row| BlogResponse::from_row(row, viewer.id()))
        .collect();

    Ok(HttpResponse::Ok().json(blogs))
}

pub async fn get_blog(
    pool: web::Data<PgPool>,
    viewer: MaybeActor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let blog_id = path.into_inner();
    let row = db::blogs::find_blog(&pool, viewer.id(), blog_id)
        .await?
        .ok_or_else(|| AppError::NotFound("blog not found".to_string()))?;

    Ok(HttpResponse::Ok().json(BlogResponse::from_row(row, viewer.id())))
}

pub async fn create_blog(
    pool: web::Data<PgPool>,
    actor: Actor,
    req: web::Json<BlogRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let blog = db::blogs::create_blog(
        &pool,
        actor.id,
        &req.title,
        &req.content,
        req.banner.as_deref(),
        req.image.as_deref(),
    )
    .await?;

    tracing::info!(blog_id = blog.id, owner_id = actor.id, "blog created");

    let row = db::blogs::find_blog(&pool, Some(actor.id), blog.id)
        .await?
        .ok_or_else(|| AppError::NotFound("blog not found".to_string()))?;

    Ok(HttpResponse::Created().json(BlogResponse::from_row(row, Some(actor.id))))
}

pub async fn update_blog(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
    req: web::Json<BlogRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let blog_id = path.into_inner();
    let owner_id = db::blogs::find_owner(&pool, blog_id)
        .await?
        .ok_or_else(|| AppError::NotFound("blog not found".to_string()))?;

    enforce(&OwnerOrReadOnly, http_req.method(), &actor, owner_id)?;

    db::blogs::update_blog(
        &pool,
        blog_id,
        &req.title,
        &req.content,
        req.banner.as_deref(),
        req.image.as_deref(),
    )
    .await?;

    let row = db::blogs::find_blog(&pool, Some(actor.id), blog_id)
        .await?
        .ok_or_else(|| AppError::NotFound("blog not found".to_string()))?;

    Ok(HttpResponse::Ok().json(BlogResponse::from_row(row, Some(actor.id))))
}

pub async fn delete_blog(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
) -> Result<HttpResponse> {
    let blog_id = path.into_inner();
    let owner_id = db::blogs::find_owner(&pool, blog_id)
        .await?
        .ok_or_else(|| AppError::NotFound("blog not found".to_string()))?;

    enforce(&OwnerOrReadOnly, http_req.method(), &actor, owner_id)?;

    db::blogs::delete_blog(&pool, blog_id).await?;

    tracing::info!(blog_id, owner_id = actor.id, "blog deleted");

    Ok(HttpResponse::NoContent().finish())
}
