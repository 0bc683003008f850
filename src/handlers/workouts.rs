/// Workout handlers. Workouts carry an ordered exercise list that is
/// replaced wholesale on update.
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
use crate::models::{WorkoutItem, WorkoutRow};

#[derive(Debug, Deserialize)]
pub struct WorkoutListQuery {
    pub ordering: Option<String>,
    pub search: Option<String>,
    pub owner: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct WorkoutItemRequest {
    #[validate(length(min = 1, max = 255))]
    pub exercise_name: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct WorkoutRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub content: String,
    pub banner: Option<String>,
    pub image: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub workout_items: Vec<WorkoutItemRequest>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutItemResponse {
    pub id: i64,
    pub exercise_name: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct WorkoutResponse {
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
    pub workout_likes_count: i64,
    pub workout_comments_count: i64,
    pub workout_like_id: Option<i64>,
    pub workout_items: Vec<WorkoutItemResponse>,
}

impl WorkoutResponse {
    pub fn from_row(row: WorkoutRow, items: Vec<WorkoutItem>, viewer_id: Option<i64>) -> Self {
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
            workout_likes_count: row.workout_likes_count,
            workout_comments_count: row.workout_comments_count,
            workout_like_id: row.workout_like_id,
            workout_items: items
                .into_iter()
                .map(|i| WorkoutItemResponse {
                    id: i.id,
                    exercise_name: i.exercise_name,
                    quantity: i.quantity,
                })
                .collect(),
        }
    }
}

fn item_tuples(req: &WorkoutRequest) -> Vec<(String, i32)> {
    req.workout_items
        .iter()
        .map(|i| (i.exercise_name.clone(), i.quantity))
        .collect()
}

pub async fn list_workouts(
    pool: web::Data<PgPool>,
    viewer: MaybeActor,
    query: web::Query<WorkoutListQuery>,
    page: web::Query<Pagination>,
) -> Result<HttpResponse> {
    let order = db::workouts::order_clause(query.ordering.as_deref());
    let rows = db::workouts::list_workouts(
        &pool,
        viewer.id(),
        query.search.as_deref(),
        query.owner,
        order,
        page.limit(),
        page.offset(),
    )
    .await?;

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut items = db::workouts::get_items_batch(&pool, &ids).await?;

    let workouts: Vec<WorkoutResponse> = rows
        .into_iter()
        .map(|row| {
            let row_items = items.remove(&row.id).unwrap_or_default();
            WorkoutResponse::from_row(row, row_items, viewer.id())
        })
        .collect();

    Ok(HttpResponse::Ok().json(workouts))
}

pub async fn get_workout(
    pool: web::Data<PgPool>,
    viewer: MaybeActor,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let workout_id = path.into_inner();
    let row = db::workouts::find_workout(&pool, viewer.id(), workout_id)
        .await?
        .ok_or_else(|| AppError::NotFound("workout not found".to_string()))?;
    let items = db::workouts::get_items(&pool, workout_id).await?;

    Ok(HttpResponse::Ok().json(WorkoutResponse::from_row(row, items, viewer.id())))
}

pub async fn create_workout(
    pool: web::Data<PgPool>,
    actor: Actor,
    req: web::Json<WorkoutRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let workout = db::workouts::create_workout(
        &pool,
        actor.id,
        &req.title,
        &req.content,
        req.banner.as_deref(),
        req.image.as_deref(),
        &item_tuples(&req),
    )
    .await?;

    tracing::info!(workout_id = workout.id, owner_id = actor.id, "workout created");

    let row = db::workouts::find_workout(&pool, Some(actor.id), workout.id)
        .await?
        .ok_or_else(|| AppError::NotFound("workout not found".to_string()))?;
    let items = db::workouts::get_items(&pool, workout.id).await?;

    Ok(HttpResponse::Created().json(WorkoutResponse::from_row(row, items, Some(actor.id))))
}

pub async fn update_workout(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
    req: web::Json<WorkoutRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let workout_id = path.into_inner();
    let owner_id = db::workouts::find_owner(&pool, workout_id)
        .await?
        .ok_or_else(|| AppError::NotFound("workout not found".to_string()))?;

    enforce(&OwnerOrReadOnly, http_req.method(), &actor, owner_id)?;

    db::workouts::update_workout(
        &pool,
        workout_id,
        &req.title,
        &req.content,
        req.banner.as_deref(),
        req.image.as_deref(),
        &item_tuples(&req),
    )
    .await?;

    let row = db::workouts::find_workout(&pool, Some(actor.id), workout_id)
        .await?
        .ok_or_else(|| AppError::NotFound("workout not found".to_string()))?;
    let items = db::workouts::get_items(&pool, workout_id).await?;

    Ok(HttpResponse::Ok().json(WorkoutResponse::from_row(row, items, Some(actor.id))))
}

pub async fn delete_workout(
    pool: web::Data<PgPool>,
    actor: Actor,
    path: web::Path<i64>,
    http_req: HttpRequest,
) -> Result<HttpResponse> {
    let workout_id = path.into_inner();
    let owner_id = db::workouts::find_owner(&pool, workout_id)
        .await?
        .ok_or_else(|| AppError::NotFound("workout not found".to_string()))?;

    enforce(&OwnerOrReadOnly, http_req.method(), &actor, owner_id)?;

    db::workouts::delete_workout(&pool, workout_id).await?;

    tracing::info!(workout_id, owner_id = actor.id, "workout deleted");

    Ok(HttpResponse::NoContent().finish())
}
