use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::{EventMembership, GroupEvent};

const EVENT_SELECT: &str = r#"
SELECT e.id, e.group_id, e.name, e.description, e.location,
       e.starts_at, e.ends_at, e.banner, e.created_at, e.updated_at
FROM group_events e
"#;

/// List events, newest first, optionally scoped to one group.
pub async fn list_events(
    pool: &PgPool,
    group_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<Vec<GroupEvent>> {
    let sql = format!(
        "{EVENT_SELECT} WHERE ($1::BIGINT IS NULL OR e.group_id = $1) \
         ORDER BY e.created_at DESC, e.id DESC LIMIT $2 OFFSET $3"
    );

    let events = sqlx::query_as::<_, GroupEvent>(&sql)
        .bind(group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(events)
}

pub async fn find_event(pool: &PgPool, event_id: i64) -> Result<Option<GroupEvent>> {
    let sql = format!("{EVENT_SELECT} WHERE e.id = $1");

    let event = sqlx::query_as::<_, GroupEvent>(&sql)
        .bind(event_id)
        .fetch_optional(pool)
        .await?;

    Ok(event)
}

#[allow(clippy::too_many_arguments)]
pub async fn create_event(
    pool: &PgPool,
    group_id: i64,
    name: &str,
    description: &str,
    location: &str,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    banner: Option<&str>,
) -> Result<GroupEvent> {
    let event = sqlx::query_as::<_, GroupEvent>(
        r#"
        INSERT INTO group_events (group_id, name, description, location, starts_at, ends_at, banner)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, group_id, name, description, location,
                  starts_at, ends_at, banner, created_at, updated_at
        "#,
    )
    .bind(group_id)
    .bind(name)
    .bind(description)
    .bind(location)
    .bind(starts_at)
    .bind(ends_at)
    .bind(banner)
    .fetch_one(pool)
    .await?;

    Ok(event)
}

#[allow(clippy::too_many_arguments)]
pub async fn update_event(
    pool: &PgPool,
    event_id: i64,
    name: &str,
    description: &str,
    location: &str,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    banner: Option<&str>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE group_events
        SET name = $1,
            description = $2,
            location = $3,
            starts_at = $4,
            ends_at = $5,
            banner = COALESCE($6, banner),
            updated_at = NOW()
        WHERE id = $7
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(location)
    .bind(starts_at)
    .bind(ends_at)
    .bind(banner)
    .bind(event_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_event(pool: &PgPool, event_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM group_events WHERE id = $1")
        .bind(event_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Mark attendance. Duplicate joins surface as a unique violation.
pub async fn join_event(pool: &PgPool, user_id: i64, event_id: i64) -> Result<EventMembership> {
    let attendance = sqlx::query_as::<_, EventMembership>(
        r#"
        INSERT INTO event_memberships (user_id, event_id)
        VALUES ($1, $2)
        RETURNING id, user_id, event_id, joined_at
        "#,
    )
    .bind(user_id)
    .bind(event_id)
    .fetch_one(pool)
    .await?;

    Ok(attendance)
}

pub async fn leave_event(pool: &PgPool, user_id: i64, event_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM event_memberships WHERE user_id = $1 AND event_id = $2")
        .bind(user_id)
        .bind(event_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
