use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Group, GroupRow, Membership};

/// Group select with member user ids aggregated from the join table.
const GROUP_SELECT: &str = r#"
SELECT g.id, g.name, g.description, g.banner, g.group_logo, g.created_at, g.updated_at,
       COALESCE(ARRAY_AGG(m.user_id) FILTER (WHERE m.user_id IS NOT NULL), '{}') AS members
FROM groups g
LEFT JOIN memberships m ON m.group_id = g.id
"#;

pub async fn list_groups(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<GroupRow>> {
    let sql = format!(
        "{GROUP_SELECT} GROUP BY g.id ORDER BY g.created_at DESC, g.id DESC LIMIT $1 OFFSET $2"
    );

    let groups = sqlx::query_as::<_, GroupRow>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(groups)
}

pub async fn find_group(pool: &PgPool, group_id: i64) -> Result<Option<GroupRow>> {
    let sql = format!("{GROUP_SELECT} WHERE g.id = $1 GROUP BY g.id");

    let group = sqlx::query_as::<_, GroupRow>(&sql)
        .bind(group_id)
        .fetch_optional(pool)
        .await?;

    Ok(group)
}

pub async fn create_group(
    pool: &PgPool,
    name: &str,
    description: &str,
    banner: Option<&str>,
    group_logo: Option<&str>,
) -> Result<Group> {
    let group = sqlx::query_as::<_, Group>(
        r#"
        INSERT INTO groups (name, description, banner, group_logo)
        VALUES ($1, $2,
                COALESCE($3, '/media/defaults/cover.png'),
                COALESCE($4, '/media/defaults/logo.png'))
        RETURNING id, name, description, banner, group_logo, created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(banner)
    .bind(group_logo)
    .fetch_one(pool)
    .await?;

    Ok(group)
}

pub async fn update_group(
    pool: &PgPool,
    group_id: i64,
    name: &str,
    description: &str,
    banner: Option<&str>,
    group_logo: Option<&str>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE groups
        SET name = $1,
            description = $2,
            banner = COALESCE($3, banner),
            group_logo = COALESCE($4, group_logo),
            updated_at = NOW()
        WHERE id = $5
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(banner)
    .bind(group_logo)
    .bind(group_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a group; memberships and events cascade.
pub async fn delete_group(pool: &PgPool, group_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM groups WHERE id = $1")
        .bind(group_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn group_exists(pool: &PgPool, group_id: i64) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM groups WHERE id = $1)")
        .bind(group_id)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

/// Join a group. The unique (user, group) pair makes the second of two
/// concurrent joins observe a conflict.
pub async fn join_group(pool: &PgPool, user_id: i64, group_id: i64) -> Result<Membership> {
    let membership = sqlx::query_as::<_, Membership>(
        r#"
        INSERT INTO memberships (user_id, group_id)
        VALUES ($1, $2)
        RETURNING id, user_id, group_id, joined_at
        "#,
    )
    .bind(user_id)
    .bind(group_id)
    .fetch_one(pool)
    .await?;

    Ok(membership)
}

/// Leave a group; returns false when there was no membership to remove.
pub async fn leave_group(pool: &PgPool, user_id: i64, group_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM memberships WHERE user_id = $1 AND group_id = $2")
        .bind(user_id)
        .bind(group_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_memberships(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Membership>> {
    let memberships = sqlx::query_as::<_, Membership>(
        r#"
        SELECT id, user_id, group_id, joined_at
        FROM memberships
        ORDER BY joined_at DESC, id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(memberships)
}
