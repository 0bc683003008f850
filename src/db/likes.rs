use sqlx::PgPool;

use crate::error::Result;
use crate::models::{BlogLike, WorkoutLike};

/// Create a blog like. A second like from the same user hits the unique
/// (owner, blog) pair and surfaces as Conflict; double-submission is an
/// error here, not an idempotent no-op.
pub async fn create_blog_like(pool: &PgPool, owner_id: i64, blog_id: i64) -> Result<BlogLike> {
    let like = sqlx::query_as::<_, BlogLike>(
        r#"
        INSERT INTO blog_likes (owner_id, blog_id)
        VALUES ($1, $2)
        RETURNING id, owner_id, blog_id, created_at
        "#,
    )
    .bind(owner_id)
    .bind(blog_id)
    .fetch_one(pool)
    .await?;

    Ok(like)
}

pub async fn find_blog_like(pool: &PgPool, like_id: i64) -> Result<Option<BlogLike>> {
    let like = sqlx::query_as::<_, BlogLike>(
        "SELECT id, owner_id, blog_id, created_at FROM blog_likes WHERE id = $1",
    )
    .bind(like_id)
    .fetch_optional(pool)
    .await?;

    Ok(like)
}

pub async fn list_blog_likes(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<BlogLike>> {
    let likes = sqlx::query_as::<_, BlogLike>(
        r#"
        SELECT id, owner_id, blog_id, created_at
        FROM blog_likes
        ORDER BY created_at DESC, id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(likes)
}

/// Unlike by like id; returns false when the like is already gone.
pub async fn delete_blog_like(pool: &PgPool, like_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM blog_likes WHERE id = $1")
        .bind(like_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn create_workout_like(
    pool: &PgPool,
    owner_id: i64,
    workout_id: i64,
) -> Result<WorkoutLike> {
    let like = sqlx::query_as::<_, WorkoutLike>(
        r#"
        INSERT INTO workout_likes (owner_id, workout_id)
        VALUES ($1, $2)
        RETURNING id, owner_id, workout_id, created_at
        "#,
    )
    .bind(owner_id)
    .bind(workout_id)
    .fetch_one(pool)
    .await?;

    Ok(like)
}

pub async fn find_workout_like(pool: &PgPool, like_id: i64) -> Result<Option<WorkoutLike>> {
    let like = sqlx::query_as::<_, WorkoutLike>(
        "SELECT id, owner_id, workout_id, created_at FROM workout_likes WHERE id = $1",
    )
    .bind(like_id)
    .fetch_optional(pool)
    .await?;

    Ok(like)
}

pub async fn list_workout_likes(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<WorkoutLike>> {
    let likes = sqlx::query_as::<_, WorkoutLike>(
        r#"
        SELECT id, owner_id, workout_id, created_at
        FROM workout_likes
        ORDER BY created_at DESC, id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(likes)
}

pub async fn delete_workout_like(pool: &PgPool, like_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM workout_likes WHERE id = $1")
        .bind(like_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
