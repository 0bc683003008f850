/// Comment handlers for blogs and workouts. Both kinds share one set of
/// generic handlers parameterized by `CommentKind`; timestamps are rendered
/// in the humanized form clients display inline.
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::db;
use crate::db::comments::CommentKind;
use crate::error::{AppError, Result};
use crate::handlers::Pagination;
use crate::middleware::permissions::{enforce, OwnerOrReadOnly};
use crate::middleware::{Actor, MaybeActor};
use crate::models::CommentRow;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBlogCommentRequest {
    pub blog: i64,
    #[validate(length(min = 1))]
    pub comment: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkoutCommentRequest {
    pub workout: i64,
    #[validate(length(min = 1))]
    pub comment: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1))]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct BlogCommentQuery {
    pub blog: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct WorkoutCommentQuery {
    pub workout: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub owner: String,
    pub is_owner: bool,
    pub profile_id: i64,
    pub profile_image: String,
    pub parent: i64,
    pub comment: String,
    pub created_at: String,
    pub updated_at: String,
}

impl CommentResponse {
    fn from_row(row: CommentRow, viewer_id: Option<i64>, now: DateTime<Utc>) -> Self {
        Self {
            id: row.id,
            owner: row.owner_username,
            is_owner: viewer_id == Some(row.owner_id),
            profile_id: row.profile_id,
            profile_image: row.profile_image,
            parent: row.parent_id,
            comment: row.comment,
            created_at: naturaltime(row.created_at, now),
            updated_at: naturaltime(row.updated_at, now),
        }
    }
}

/// Render a timestamp relative to now ("3 minutes ago").
fn naturaltime(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let seconds = delta.num_seconds();

    if seconds < 60 {
        return "now".to_string();
    }

    let (count, unit) = if seconds < 3600 {
        (delta.num_minutes(), "minute")
    } else if seconds < 86_400 {
        (delta.num_hours(), "hour")
    } else if seconds < 2_592_000 {
        (delta.num_days(), "day")
    } else if seconds < 31_536_000 {
        (delta.num_days() / 30, "month")
    } else {
        (delta.num_days() / 365, "year")
    };

    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

async fn create(
    pool: &PgPool,
    kind: CommentKind,
    actor: &Actor,
    parent_id: i64,
    comment: &str,
) -> Result<HttpResponse> {
    let row = db::comments::create_comment(pool, kind, actor.id, parent_id, comment).await?;
    Ok(HttpResponse::Created().json(CommentResponse::from_row(
        row,
        Some(actor.id),
        Utc::now(),
    )))
}

async fn list(
    pool: &PgPool,
    kind: CommentKind,
    viewer_id: Option<i64>,
    parent_id: Option<i64>,
    page: &Pagination,
) -> Result<HttpResponse> {
    let rows = db::comments::list_comments(pool, kind, parent_id, page.limit(), page.offset())
        .await?;
    let now = Utc::now();
    let comments: Vec<CommentResponse> = rows
        .into_iter()
        .map(|row| CommentResponse::from_row(row, viewer_id, now))
        .collect();
    Ok(HttpResponse::Ok().json(comments))
}

async fn get(
    pool: &PgPool,
    kind: CommentKind,
    viewer_id: Option<i64>,
    comment_id: i64,
) -> Result<HttpResponse> {
    let row = db::comments::find_comment(pool, kind, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;
    Ok(HttpResponse::Ok().json(CommentResponse::from_row(row, viewer_id, Utc::now())))
}

async fn update(
    pool: &PgPool,
    kind: CommentKind,
    actor: &Actor,
    http_req: &HttpRequest,
    comment_id: i64,
    comment: &str,
) -> Result<HttpResponse> {
    let owner_id = db::comments::find_owner(pool, kind, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;

    enforce(&OwnerOrReadOnly, http_req.method(), actor, owner_id)?;

    db::comments::update_comment(pool, kind, comment_id, comment).await?;

    let row = db::comments::find_comment(pool, kind, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;
    Ok(HttpResponse::Ok().json(CommentResponse::from_row(
        row,
        Some(actor.id),
        Utc::now(),
    )))
}

async fn delete(
    pool: &PgPool,
    kind: CommentKind,
    actor: &Actor,
    http_req: &HttpRequest,
    comment_id: i64,
) -> Result<HttpResponse> {
    let owner_id = db::comments::find_owner(pool, kind, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("comment not found".to_string()))?;

    enforce(&OwnerOrReadOnly, http_req.method(), actor, owner_id)?;

    db::comments::delete_comment(pool, kind, comment_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

// Blog comments

pub async fn create_blog_comment(
    pool: web::Data<PgPool>,
    actor: Actor,
    req: web::Json<CreateBlogCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    create(&pool, CommentKind::Blog, &actor, req.blog, &req.comment).await
}

pub async fn list_blog_comments(
    pool: web::Data<PgPool>,
    viewer: MaybeActor,
    query: web::Query<BlogCommentQuery>,
    page: web::Query<Pagination>,
) -> Result<HttpResponse> {
    list(&pool, CommentKind::Blog, viewer.id(), query.blog, &page).await
}

pub async fn get_blog_comment(
    pool: web::Data<PgPool>,
    viewer: MaybeActor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    get(&pool, CommentKind::Blog, viewer.id(), path.into_inner()).await
}

pub async fn update_blog_comment(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
    req: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    update(
        &pool,
        CommentKind::Blog,
        &actor,
        &http_req,
        path.into_inner(),
        &req.comment,
    )
    .await
}

pub async fn delete_blog_comment(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
) -> Result<HttpResponse> {
    delete(&pool, CommentKind::Blog, &actor, &http_req, path.into_inner()).await
}

// Workout comments

pub async fn create_workout_comment(
    pool: web::Data<PgPool>,
    actor: Actor,
    req: web::Json<CreateWorkoutCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    create(&pool, CommentKind::Workout, &actor, req.workout, &req.comment).await
}

pub async fn list_workout_comments(
    pool: web::Data<PgPool>,
    viewer: MaybeActor,
    query: web::Query<WorkoutCommentQuery>,
    page: web::Query<Pagination>,
) -> Result<HttpResponse> {
    list(&pool, CommentKind::Workout, viewer.id(), query.workout, &page).await
}

pub async fn get_workout_comment(
    pool: web::Data<PgPool>,
    viewer: MaybeActor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    get(&pool, CommentKind::Workout, viewer.id(), path.into_inner()).await
}

pub async fn update_workout_comment(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
    req: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    update(
        &pool,
        CommentKind::Workout,
        &actor,
        &http_req,
        path.into_inner(),
        &req.comment,
    )
    .await
}

pub async fn delete_workout_comment(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
) -> Result<HttpResponse> {
    delete(&pool, CommentKind::Workout, &actor, &http_req, path.into_inner()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn recent_timestamps_render_as_now() {
        let now = Utc::now();
        assert_eq!(naturaltime(now - Duration::seconds(30), now), "now");
    }

    #[test]
    fn singular_and_plural_units() {
        let now = Utc::now();
        assert_eq!(naturaltime(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(naturaltime(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(naturaltime(now - Duration::days(2), now), "2 days ago");
        assert_eq!(naturaltime(now - Duration::days(400), now), "1 year ago");
    }
}
