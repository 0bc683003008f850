/// Group handlers. Creation and edits are admin gated; any authenticated
/// user can join or leave.
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::Pagination;
use crate::middleware::permissions::{enforce, AdminOrReadOnly};
use crate::middleware::Actor;

#[derive(Debug, Deserialize, Validate)]
pub struct GroupRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: String,
    pub banner: Option<String>,
    pub group_logo: Option<String>,
}

pub async fn list_groups(
    pool: web::Data<PgPool>,
    page: web::Query<Pagination>,
) -> Result<HttpResponse> {
    let groups = db::groups::list_groups(&pool, page.limit(), page.offset()).await?;
    Ok(HttpResponse::Ok().json(groups))
}

pub async fn get_group(pool: web::Data<PgPool>, path: web::Path<i64>) -> Result<HttpResponse> {
    let group = db::groups::find_group(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("group not found".to_string()))?;
    Ok(HttpResponse::Ok().json(group))
}

pub async fn create_group(
    pool: web::Data<PgPool>,
    actor: Actor,
    http_req: HttpRequest,
    req: web::Json<GroupRequest>,
) -> Result<HttpResponse> {
    enforce(&AdminOrReadOnly, http_req.method(), &actor, 0)?;
    req.validate()?;

    let group = db::groups::create_group(
        &pool,
        &req.name,
        &req.description,
        req.banner.as_deref(),
        req.group_logo.as_deref(),
    )
    .await?;

    tracing::info!(group_id = group.id, admin_id = actor.id, "group created");

    let row = db::groups::find_group(&pool, group.id)
        .await?
        .ok_or_else(|| AppError::NotFound("group not found".to_string()))?;

    Ok(HttpResponse::Created().json(row))
}

pub async fn update_group(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
    req: web::Json<GroupRequest>,
) -> Result<HttpResponse> {
    enforce(&AdminOrReadOnly, http_req.method(), &actor, 0)?;
    req.validate()?;

    let group_id = path.into_inner();
    let updated = db::groups::update_group(
        &pool,
        group_id,
        &req.name,
        &req.description,
        req.banner.as_deref(),
        req.group_logo.as_deref(),
    )
    .await?;

    if !updated {
        return Err(AppError::NotFound("group not found".to_string()));
    }

    let row = db::groups::find_group(&pool, group_id)
        .await?
        .ok_or_else(|| AppError::NotFound("group not found".to_string()))?;

    Ok(HttpResponse::Ok().json(row))
}

pub async fn delete_group(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
) -> Result<HttpResponse> {
    enforce(&AdminOrReadOnly, http_req.method(), &actor, 0)?;

    let group_id = path.into_inner();
    if !db::groups::delete_group(&pool, group_id).await? {
        return Err(AppError::NotFound("group not found".to_string()));
    }

    tracing::info!(group_id, admin_id = actor.id, "group deleted");

    Ok(HttpResponse::NoContent().finish())
}

pub async fn join_group(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let group_id = path.into_inner();
    if !db::groups::group_exists(&pool, group_id).await? {
        return Err(AppError::NotFound("group not found".to_string()));
    }

    let membership = db::groups::join_group(&pool, actor.id, group_id).await?;

    Ok(HttpResponse::Created().json(membership))
}

pub async fn leave_group(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let group_id = path.into_inner();
    if !db::groups::leave_group(&pool, actor.id, group_id).await? {
        return Err(AppError::NotFound("membership not found".to_string()));
    }

    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_memberships(
    pool: web::Data<PgPool>,
    _actor: Actor,
    page: web::Query<Pagination>,
) -> Result<HttpResponse> {
    let memberships = db::groups::list_memberships(&pool, page.limit(), page.offset()).await?;
    Ok(HttpResponse::Ok().json(memberships))
}
