use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Profile, User};

/// Create a user and their profile in one transaction.
///
/// Profile creation is an explicit step of user creation, not a listener:
/// either both rows exist afterwards or neither does.
pub async fn create_user_with_profile(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<(User, Profile)> {
    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, username, email, password_hash, is_staff, is_superuser, created_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(&mut *tx)
    .await?;

    let profile = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (owner_id)
        VALUES ($1)
        RETURNING id, owner_id, name, bio, profile_image, cover_image, display_name,
                  created_at, updated_at
        "#,
    )
    .bind(user.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((user, profile))
}

/// Find a user by username (login)
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, is_staff, is_superuser, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Find a user by id
pub async fn find_by_id(pool: &PgPool, user_id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, is_staff, is_superuser, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
