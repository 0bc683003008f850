use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};

use crate::error::Result;
use crate::models::{Workout, WorkoutItem, WorkoutRow};

/// Annotated workout select, same shape as the blog select.
const WORKOUT_SELECT: &str = r#"
SELECT w.id, w.owner_id, u.username AS owner_username, p.id AS profile_id,
       p.profile_image, w.title, w.content, w.banner, w.image,
       w.created_at, w.updated_at,
       (SELECT COUNT(*) FROM workout_likes l WHERE l.workout_id = w.id) AS workout_likes_count,
       (SELECT COUNT(*) FROM workout_comments c WHERE c.workout_id = w.id) AS workout_comments_count,
       ml.id AS workout_like_id
FROM workouts w
JOIN users u ON u.id = w.owner_id
JOIN profiles p ON p.owner_id = w.owner_id
LEFT JOIN workout_likes ml ON ml.workout_id = w.id AND ml.owner_id = $1
"#;

pub fn order_clause(param: Option<&str>) -> &'static str {
    match param {
        Some("workout_likes_count") => "workout_likes_count ASC",
        Some("-workout_likes_count") => "workout_likes_count DESC",
        Some("workout_comments_count") => "workout_comments_count ASC",
        Some("-workout_comments_count") => "workout_comments_count DESC",
        Some("created_at") => "w.created_at ASC, w.id ASC",
        _ => "w.created_at DESC, w.id DESC",
    }
}

pub async fn list_workouts(
    pool: &PgPool,
    viewer_id: Option<i64>,
    search: Option<&str>,
    owner_id: Option<i64>,
    order: &'static str,
    limit: i64,
    offset: i64,
) -> Result<Vec<WorkoutRow>> {
    let sql = format!(
        r#"{WORKOUT_SELECT}
        WHERE ($2::TEXT IS NULL OR w.title ILIKE '%' || $2 || '%' OR u.username ILIKE '%' || $2 || '%')
          AND ($3::BIGINT IS NULL OR w.owner_id = $3)
        ORDER BY {order}
        LIMIT $4 OFFSET $5
        "#
    );

    let workouts = sqlx::query_as::<_, WorkoutRow>(&sql)
        .bind(viewer_id)
        .bind(search)
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(workouts)
}

pub const FOLLOWED_OWNERS: &str =
    "w.owner_id IN (SELECT followed_id FROM follows WHERE owner_id = $1)";

/// Workouts owned by the users the viewer follows, newest first.
pub async fn list_followed_workouts(pool: &PgPool, viewer_id: i64) -> Result<Vec<WorkoutRow>> {
    let sql = format!(
        r#"{WORKOUT_SELECT}
        WHERE {FOLLOWED_OWNERS}
        ORDER BY w.created_at DESC, w.id DESC
        "#
    );

    let workouts = sqlx::query_as::<_, WorkoutRow>(&sql)
        .bind(viewer_id)
        .fetch_all(pool)
        .await?;

    Ok(workouts)
}

pub async fn find_workout(
    pool: &PgPool,
    viewer_id: Option<i64>,
    workout_id: i64,
) -> Result<Option<WorkoutRow>> {
    let sql = format!("{WORKOUT_SELECT} WHERE w.id = $2");

    let workout = sqlx::query_as::<_, WorkoutRow>(&sql)
        .bind(viewer_id)
        .bind(workout_id)
        .fetch_optional(pool)
        .await?;

    Ok(workout)
}

/// Create a workout with its ordered item list in one transaction.
pub async fn create_workout(
    pool: &PgPool,
    owner_id: i64,
    title: &str,
    content: &str,
    banner: Option<&str>,
    image: Option<&str>,
    items: &[(String, i32)],
) -> Result<Workout> {
    let mut tx = pool.begin().await?;

    let workout = sqlx::query_as::<_, Workout>(
        r#"
        INSERT INTO workouts (owner_id, title, content, banner, image)
        VALUES ($1, $2, $3,
                COALESCE($4, '/media/defaults/workout_banner.png'),
                COALESCE($5, '/media/defaults/post.png'))
        RETURNING id, owner_id, title, content, banner, image, created_at, updated_at
        "#,
    )
    .bind(owner_id)
    .bind(title)
    .bind(content)
    .bind(banner)
    .bind(image)
    .fetch_one(&mut *tx)
    .await?;

    insert_items(&mut tx, workout.id, items).await?;

    tx.commit().await?;

    Ok(workout)
}

/// Update a workout and REPLACE its entire item list: delete everything,
/// insert the submitted list in order, all inside one transaction. Items
/// carry no identity across edits, so there is nothing to diff.
pub async fn update_workout(
    pool: &PgPool,
    workout_id: i64,
    title: &str,
    content: &str,
    banner: Option<&str>,
    image: Option<&str>,
    items: &[(String, i32)],
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE workouts
        SET title = $1,
            content = $2,
            banner = COALESCE($3, banner),
            image = COALESCE($4, image),
            updated_at = NOW()
        WHERE id = $5
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(banner)
    .bind(image)
    .bind(workout_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query(ITEMS_DELETE)
        .bind(workout_id)
        .execute(&mut *tx)
        .await?;

    insert_items(&mut tx, workout_id, items).await?;

    tx.commit().await?;

    Ok(true)
}

const ITEMS_DELETE: &str = "DELETE FROM workout_items WHERE workout_id = $1";

const ITEM_INSERT: &str = r#"
INSERT INTO workout_items (workout_id, exercise_name, quantity, position)
VALUES ($1, $2, $3, $4)
"#;

/// Positions follow submitted order; items carry no identity of their own.
fn positioned<'a>(items: &'a [(String, i32)]) -> impl Iterator<Item = (i32, &'a str, i32)> + 'a {
    items
        .iter()
        .enumerate()
        .map(|(position, (exercise_name, quantity))| {
            (position as i32, exercise_name.as_str(), *quantity)
        })
}

async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    workout_id: i64,
    items: &[(String, i32)],
) -> Result<()> {
    for (position, exercise_name, quantity) in positioned(items) {
        sqlx::query(ITEM_INSERT)
            .bind(workout_id)
            .bind(exercise_name)
            .bind(quantity)
            .bind(position)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

/// Items for one workout, in submitted order.
pub async fn get_items(pool: &PgPool, workout_id: i64) -> Result<Vec<WorkoutItem>> {
    let items = sqlx::query_as::<_, WorkoutItem>(
        r#"
        SELECT id, workout_id, exercise_name, quantity, position
        FROM workout_items
        WHERE workout_id = $1
        ORDER BY position ASC
        "#,
    )
    .bind(workout_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Items for a page of workouts, grouped by workout id.
pub async fn get_items_batch(
    pool: &PgPool,
    workout_ids: &[i64],
) -> Result<HashMap<i64, Vec<WorkoutItem>>> {
    if workout_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let items = sqlx::query_as::<_, WorkoutItem>(
        r#"
        SELECT id, workout_id, exercise_name, quantity, position
        FROM workout_items
        WHERE workout_id = ANY($1)
        ORDER BY workout_id, position ASC
        "#,
    )
    .bind(workout_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<i64, Vec<WorkoutItem>> = HashMap::new();
    for item in items {
        grouped.entry(item.workout_id).or_default().push(item);
    }

    Ok(grouped)
}

pub async fn delete_workout(pool: &PgPool, workout_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
        .bind(workout_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn find_owner(pool: &PgPool, workout_id: i64) -> Result<Option<i64>> {
    let owner: Option<i64> = sqlx::query_scalar("SELECT owner_id FROM workouts WHERE id = $1")
        .bind(workout_id)
        .fetch_optional(pool)
        .await?;

    Ok(owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_whitelisted() {
        assert_eq!(order_clause(Some("-workout_likes_count")), "workout_likes_count DESC");
        assert_eq!(order_clause(Some("w.title; --")), "w.created_at DESC, w.id DESC");
    }

    #[test]
    fn annotated_select_only_joins_the_viewers_like() {
        assert!(WORKOUT_SELECT.contains("ml.owner_id = $1"));
        assert!(WORKOUT_SELECT.contains("(SELECT COUNT(*) FROM workout_likes"));
    }

    #[test]
    fn followed_filter_restricts_to_the_viewers_follow_set() {
        assert!(FOLLOWED_OWNERS.contains("IN (SELECT followed_id FROM follows"));
        assert!(FOLLOWED_OWNERS.contains("owner_id = $1"));
    }

    #[test]
    fn editing_replaces_the_whole_item_list() {
        // No per-item UPDATE exists: edits delete every row for the workout
        // and re-insert the submitted list.
        assert_eq!(ITEMS_DELETE, "DELETE FROM workout_items WHERE workout_id = $1");
        assert!(ITEM_INSERT.contains("INSERT INTO workout_items"));
        assert!(ITEM_INSERT.contains("position"));
    }

    #[test]
    fn item_positions_follow_submitted_order() {
        let items = vec![("Squat".to_string(), 5), ("Plank".to_string(), 60)];
        let rows: Vec<_> = positioned(&items).collect();

        assert_eq!(rows, vec![(0, "Squat", 5), (1, "Plank", 60)]);
    }
}
