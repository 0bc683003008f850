use sqlx::PgPool;

use crate::error::Result;
use crate::models::ProfileRow;

/// Columns shared by the list and detail queries. Counts are scalar
/// subqueries so they are live at query time; `mf` is the viewer's own
/// follow edge toward the profile owner.
const PROFILE_SELECT: &str = r#"
SELECT p.id, p.owner_id, u.username AS owner_username, u.email, p.name, p.bio,
       p.profile_image, p.cover_image, p.display_name, p.created_at, p.updated_at,
       (SELECT COUNT(*) FROM blogs b WHERE b.owner_id = p.owner_id) AS blogs_count,
       (SELECT COUNT(*) FROM workouts w WHERE w.owner_id = p.owner_id) AS workouts_count,
       (SELECT COUNT(*) FROM follows f WHERE f.followed_id = p.owner_id) AS followers_count,
       (SELECT COUNT(*) FROM follows f WHERE f.owner_id = p.owner_id) AS following_count,
       mf.id AS following_id
FROM profiles p
JOIN users u ON u.id = p.owner_id
LEFT JOIN follows mf ON mf.owner_id = $1 AND mf.followed_id = p.owner_id
"#;

/// Whitelisted ordering parameters; anything else falls back to newest
/// first with id as the deterministic tiebreak.
pub fn order_clause(param: Option<&str>) -> &'static str {
    match param {
        Some("blogs_count") => "blogs_count ASC",
        Some("-blogs_count") => "blogs_count DESC",
        Some("workouts_count") => "workouts_count ASC",
        Some("-workouts_count") => "workouts_count DESC",
        Some("followers_count") => "followers_count ASC",
        Some("-followers_count") => "followers_count DESC",
        Some("following_count") => "following_count ASC",
        Some("-following_count") => "following_count DESC",
        Some("created_at") => "p.created_at ASC, p.id ASC",
        _ => "p.created_at DESC, p.id DESC",
    }
}

/// List profiles annotated with relationship counts.
pub async fn list_profiles(
    pool: &PgPool,
    viewer_id: i64,
    order: &'static str,
    limit: i64,
    offset: i64,
) -> Result<Vec<ProfileRow>> {
    let sql = format!("{PROFILE_SELECT} ORDER BY {order} LIMIT $2 OFFSET $3");

    let profiles = sqlx::query_as::<_, ProfileRow>(&sql)
        .bind(viewer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(profiles)
}

/// Fetch one profile with the same annotations as the list.
pub async fn find_profile(
    pool: &PgPool,
    viewer_id: i64,
    profile_id: i64,
) -> Result<Option<ProfileRow>> {
    let sql = format!("{PROFILE_SELECT} WHERE p.id = $2");

    let profile = sqlx::query_as::<_, ProfileRow>(&sql)
        .bind(viewer_id)
        .bind(profile_id)
        .fetch_optional(pool)
        .await?;

    Ok(profile)
}

/// Profile of a given user, with the same annotations as the list.
pub async fn find_by_owner(
    pool: &PgPool,
    viewer_id: i64,
    owner_id: i64,
) -> Result<Option<ProfileRow>> {
    let sql = format!("{PROFILE_SELECT} WHERE p.owner_id = $2");

    let profile = sqlx::query_as::<_, ProfileRow>(&sql)
        .bind(viewer_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

    Ok(profile)
}

/// Update profile fields, and the owner's email when one is submitted,
/// in a single transaction.
#[allow(clippy::too_many_arguments)]
pub async fn update_profile(
    pool: &PgPool,
    profile_id: i64,
    name: &str,
    bio: &str,
    display_name: bool,
    profile_image: Option<&str>,
    cover_image: Option<&str>,
    email: Option<&str>,
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE profiles
        SET name = $1,
            bio = $2,
            display_name = $3,
            profile_image = COALESCE($4, profile_image),
            cover_image = COALESCE($5, cover_image),
            updated_at = NOW()
        WHERE id = $6
        "#,
    )
    .bind(name)
    .bind(bio)
    .bind(display_name)
    .bind(profile_image)
    .bind(cover_image)
    .bind(profile_id)
    .execute(&mut *tx)
    .await?;

    if let Some(email) = email {
        sqlx::query(
            "UPDATE users SET email = $1 WHERE id = (SELECT owner_id FROM profiles WHERE id = $2)",
        )
        .bind(email)
        .bind(profile_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

/// Owner lookup used by the permission check before mutating
pub async fn find_owner(pool: &PgPool, profile_id: i64) -> Result<Option<i64>> {
    let owner: Option<i64> = sqlx::query_scalar("SELECT owner_id FROM profiles WHERE id = $1")
        .bind(profile_id)
        .fetch_optional(pool)
        .await?;

    Ok(owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ordering_falls_back_to_newest_first() {
        assert_eq!(
            order_clause(Some("owner_id; DROP TABLE users")),
            "p.created_at DESC, p.id DESC"
        );
        assert_eq!(order_clause(None), "p.created_at DESC, p.id DESC");
    }

    #[test]
    fn count_orderings_are_whitelisted() {
        assert_eq!(order_clause(Some("-followers_count")), "followers_count DESC");
        assert_eq!(order_clause(Some("blogs_count")), "blogs_count ASC");
    }
}
