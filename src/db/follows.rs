use sqlx::PgPool;

use crate::error::Result;
use crate::models::FollowRow;

const FOLLOW_SELECT: &str = r#"
SELECT f.id, f.owner_id, uo.username AS owner_username,
       f.followed_id, uf.username AS followed_name, f.created_at
FROM follows f
JOIN users uo ON uo.id = f.owner_id
JOIN users uf ON uf.id = f.followed_id
"#;

/// Create a follow edge. Duplicates surface as a unique violation from the
/// storage layer; the caller maps that to Conflict.
pub async fn create_follow(pool: &PgPool, owner_id: i64, followed_id: i64) -> Result<FollowRow> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO follows (owner_id, followed_id)
        VALUES ($1, $2)
        RETURNING id
        "#,
    )
    .bind(owner_id)
    .bind(followed_id)
    .fetch_one(pool)
    .await?;

    let sql = format!("{FOLLOW_SELECT} WHERE f.id = $1");
    let follow = sqlx::query_as::<_, FollowRow>(&sql)
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(follow)
}

pub async fn list_follows(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<FollowRow>> {
    let sql = format!("{FOLLOW_SELECT} ORDER BY f.created_at DESC, f.id DESC LIMIT $1 OFFSET $2");

    let follows = sqlx::query_as::<_, FollowRow>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(follows)
}

pub async fn find_follow(pool: &PgPool, follow_id: i64) -> Result<Option<FollowRow>> {
    let sql = format!("{FOLLOW_SELECT} WHERE f.id = $1");

    let follow = sqlx::query_as::<_, FollowRow>(&sql)
        .bind(follow_id)
        .fetch_optional(pool)
        .await?;

    Ok(follow)
}

/// Delete a follow edge by id; returns false when the edge is absent.
pub async fn delete_follow(pool: &PgPool, follow_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM follows WHERE id = $1")
        .bind(follow_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_owner(pool: &PgPool, follow_id: i64) -> Result<Option<i64>> {
    let owner: Option<i64> = sqlx::query_scalar("SELECT owner_id FROM follows WHERE id = $1")
        .bind(follow_id)
        .fetch_optional(pool)
        .await?;

    Ok(owner)
}
