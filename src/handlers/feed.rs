/// Personalized feed endpoint
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::Result;
use crate::handlers::blogs::BlogResponse;
use crate::handlers::workouts::WorkoutResponse;
use crate::middleware::Actor;
use crate::services::feed::{self, FeedEntry};

/// One feed item, tagged by content type so clients can render each card.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedItemResponse {
    Blog(BlogResponse),
    Workout(WorkoutResponse),
}

pub async fn get_feed(pool: web::Data<PgPool>, actor: Actor) -> Result<HttpResponse> {
    let entries = feed::build_feed(&pool, actor.id).await?;

    let feed: Vec<FeedItemResponse> = entries
        .into_iter()
        .map(|entry| match entry {
            FeedEntry::Blog(row) => {
                FeedItemResponse::Blog(BlogResponse::from_row(row, Some(actor.id)))
            }
            FeedEntry::Workout(row, items) => FeedItemResponse::Workout(
                WorkoutResponse::from_row(row, items, Some(actor.id)),
            ),
        })
        .collect();

    Ok(HttpResponse::Ok().json(feed))
}
