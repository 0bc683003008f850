/// Group event handlers, mirroring the group surface with attendance
/// instead of membership.
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::Pagination;
use crate::middleware::permissions::{enforce, AdminOrReadOnly};
use crate::middleware::Actor;

#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    pub group: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EventRequest {
    pub group: i64,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: String,
    pub location: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub banner: Option<String>,
}

impl EventRequest {
    fn check_window(&self) -> Result<()> {
        if self.ends_at <= self.starts_at {
            return Err(AppError::ValidationError(
                "Event must end after it starts".to_string(),
            ));
        }
        Ok(())
    }
}

pub async fn list_events(
    pool: web::Data<PgPool>,
    query: web::Query<EventListQuery>,
    page: web::Query<Pagination>,
) -> Result<HttpResponse> {
    let events = db::events::list_events(&pool, query.group, page.limit(), page.offset()).await?;
    Ok(HttpResponse::Ok().json(events))
}

pub async fn get_event(pool: web::Data<PgPool>, path: web::Path<i64>) -> Result<HttpResponse> {
    let event = db::events::find_event(&pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("event not found".to_string()))?;
    Ok(HttpResponse::Ok().json(event))
}

pub async fn create_event(
    pool: web::Data<PgPool>,
    actor: Actor,
    http_req: HttpRequest,
    req: web::Json<EventRequest>,
) -> Result<HttpResponse> {
    enforce(&AdminOrReadOnly, http_req.method(), &actor, 0)?;
    req.validate()?;
    req.check_window()?;

    if !db::groups::group_exists(&pool, req.group).await? {
        return Err(AppError::NotFound("group not found".to_string()));
    }

    let event = db::events::create_event(
        &pool,
        req.group,
        &req.name,
        &req.description,
        &req.location,
        req.starts_at,
        req.ends_at,
        req.banner.as_deref(),
    )
    .await?;

    tracing::info!(event_id = event.id, group_id = req.group, "event created");

    Ok(HttpResponse::Created().json(event))
}

pub async fn update_event(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
    req: web::Json<EventRequest>,
) -> Result<HttpResponse> {
    enforce(&AdminOrReadOnly, http_req.method(), &actor, 0)?;
    req.validate()?;
    req.check_window()?;

    let event_id = path.into_inner();
    let updated = db::events::update_event(
        &pool,
        event_id,
        &req.name,
        &req.description,
        &req.location,
        req.starts_at,
        req.ends_at,
        req.banner.as_deref(),
    )
    .await?;

    if !updated {
        return Err(AppError::NotFound("event not found".to_string()));
    }

    let event = db::events::find_event(&pool, event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("event not found".to_string()))?;

    Ok(HttpResponse::Ok().json(event))
}

pub async fn delete_event(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
) -> Result<HttpResponse> {
    enforce(&AdminOrReadOnly, http_req.method(), &actor, 0)?;

    let event_id = path.into_inner();
    if !db::events::delete_event(&pool, event_id).await? {
        return Err(AppError::NotFound("event not found".to_string()));
    }

    tracing::info!(event_id, admin_id = actor.id, "event deleted");

    Ok(HttpResponse::NoContent().finish())
}

pub async fn join_event(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let event_id = path.into_inner();
    if db::events::find_event(&pool, event_id).await?.is_none() {
        return Err(AppError::NotFound("event not found".to_string()));
    }

    let attendance = db::events::join_event(&pool, actor.id, event_id).await?;

    Ok(HttpResponse::Created().json(attendance))
}

pub async fn leave_event(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let event_id = path.into_inner();
    if !db::events::leave_event(&pool, actor.id, event_id).await? {
        return Err(AppError::NotFound("attendance not found".to_string()));
    }

    Ok(HttpResponse::NoContent().finish())
}
