use sqlx::PgPool;

use crate::error::Result;
use crate::models::CommentRow;

/// Blog and workout comments share one shape and one set of queries; only
/// the table and parent column differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Blog,
    Workout,
}

impl CommentKind {
    fn table(self) -> &'static str {
        match self {
            CommentKind::Blog => "blog_comments",
            CommentKind::Workout => "workout_comments",
        }
    }

    fn parent_column(self) -> &'static str {
        match self {
            CommentKind::Blog => "blog_id",
            CommentKind::Workout => "workout_id",
        }
    }
}

fn comment_select(kind: CommentKind) -> String {
    format!(
        r#"
        SELECT c.id, c.owner_id, u.username AS owner_username, p.id AS profile_id,
               p.profile_image, c.{parent} AS parent_id, c.comment,
               c.created_at, c.updated_at
        FROM {table} c
        JOIN users u ON u.id = c.owner_id
        JOIN profiles p ON p.owner_id = c.owner_id
        "#,
        parent = kind.parent_column(),
        table = kind.table(),
    )
}

pub async fn create_comment(
    pool: &PgPool,
    kind: CommentKind,
    owner_id: i64,
    parent_id: i64,
    comment: &str,
) -> Result<CommentRow> {
    let insert = format!(
        "INSERT INTO {table} (owner_id, {parent}, comment) VALUES ($1, $2, $3) RETURNING id",
        table = kind.table(),
        parent = kind.parent_column(),
    );

    let id: i64 = sqlx::query_scalar(&insert)
        .bind(owner_id)
        .bind(parent_id)
        .bind(comment)
        .fetch_one(pool)
        .await?;

    let sql = format!("{} WHERE c.id = $1", comment_select(kind));
    let row = sqlx::query_as::<_, CommentRow>(&sql)
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(row)
}

/// List comments, optionally filtered to one parent content item.
pub async fn list_comments(
    pool: &PgPool,
    kind: CommentKind,
    parent_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<Vec<CommentRow>> {
    let sql = format!(
        r#"{select}
        WHERE ($1::BIGINT IS NULL OR c.{parent} = $1)
        ORDER BY c.created_at DESC, c.id DESC
        LIMIT $2 OFFSET $3
        "#,
        select = comment_select(kind),
        parent = kind.parent_column(),
    );

    let comments = sqlx::query_as::<_, CommentRow>(&sql)
        .bind(parent_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(comments)
}

pub async fn find_comment(
    pool: &PgPool,
    kind: CommentKind,
    comment_id: i64,
) -> Result<Option<CommentRow>> {
    let sql = format!("{} WHERE c.id = $1", comment_select(kind));

    let comment = sqlx::query_as::<_, CommentRow>(&sql)
        .bind(comment_id)
        .fetch_optional(pool)
        .await?;

    Ok(comment)
}

pub async fn update_comment(
    pool: &PgPool,
    kind: CommentKind,
    comment_id: i64,
    comment: &str,
) -> Result<bool> {
    let sql = format!(
        "UPDATE {table} SET comment = $1, updated_at = NOW() WHERE id = $2",
        table = kind.table(),
    );

    let result = sqlx::query(&sql)
        .bind(comment)
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_comment(pool: &PgPool, kind: CommentKind, comment_id: i64) -> Result<bool> {
    let sql = format!("DELETE FROM {table} WHERE id = $1", table = kind.table());

    let result = sqlx::query(&sql).bind(comment_id).execute(pool).await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_owner(pool: &PgPool, kind: CommentKind, comment_id: i64) -> Result<Option<i64>> {
    let sql = format!(
        "SELECT owner_id FROM {table} WHERE id = $1",
        table = kind.table()
    );

    let owner: Option<i64> = sqlx::query_scalar(&sql)
        .bind(comment_id)
        .fetch_optional(pool)
        .await?;

    Ok(owner)
}
