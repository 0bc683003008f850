use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Blog, BlogRow};

/// Annotated blog select: live like/comment counts as scalar subqueries,
/// plus the viewer's own like row ($1, NULL for anonymous readers - the
/// join then never matches and nobody else's like rows leak).
const BLOG_SELECT: &str = r#"
SELECT b.id, b.owner_id, u.username AS owner_username, p.id AS profile_id,
       p.profile_image, b.title, b.content, b.banner, b.image,
       b.created_at, b.updated_at,
       (SELECT COUNT(*) FROM blog_likes l WHERE l.blog_id = b.id) AS blog_likes_count,
       (SELECT COUNT(*) FROM blog_comments c WHERE c.blog_id = b.id) AS blog_comments_count,
       ml.id AS blog_like_id
FROM blogs b
JOIN users u ON u.id = b.owner_id
JOIN profiles p ON p.owner_id = b.owner_id
LEFT JOIN blog_likes ml ON ml.blog_id = b.id AND ml.owner_id = $1
"#;

pub fn order_clause(param: Option<&str>) -> &'static str {
    match param {
        Some("blog_likes_count") => "blog_likes_count ASC",
        Some("-blog_likes_count") => "blog_likes_count DESC",
        Some("blog_comments_count") => "blog_comments_count ASC",
        Some("-blog_comments_count") => "blog_comments_count DESC",
        Some("created_at") => "b.created_at ASC, b.id ASC",
        _ => "b.created_at DESC, b.id DESC",
    }
}

/// List blogs, optionally narrowed by a title/username search term or an
/// owning user.
pub async fn list_blogs(
    pool: &PgPool,
    viewer_id: Option<i64>,
    search: Option<&str>,
    owner_id: Option<i64>,
    order: &'static str,
    limit: i64,
    offset: i64,
) -> Result<Vec<BlogRow>> {
    let sql = format!(
        r#"{BLOG_SELECT}
        WHERE ($2::TEXT IS NULL OR b.title ILIKE '%' || $2 || '%' OR u.username ILIKE '%' || $2 || '%')
          AND ($3::BIGINT IS NULL OR b.owner_id = $3)
        ORDER BY {order}
        LIMIT $4 OFFSET $5
        "#
    );

    let blogs = sqlx::query_as::<_, BlogRow>(&sql)
        .bind(viewer_id)
        .bind(search)
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(blogs)
}

pub const FOLLOWED_OWNERS: &str =
    "b.owner_id IN (SELECT followed_id FROM follows WHERE owner_id = $1)";

/// Blogs owned by the users the viewer follows, newest first.
pub async fn list_followed_blogs(pool: &PgPool, viewer_id: i64) -> Result<Vec<BlogRow>> {
    let sql = format!(
        r#"{BLOG_SELECT}
        WHERE {FOLLOWED_OWNERS}
        ORDER BY b.created_at DESC, b.id DESC
        "#
    );

    let blogs = sqlx::query_as::<_, BlogRow>(&sql)
        .bind(viewer_id)
        .fetch_all(pool)
        .await?;

    Ok(blogs)
}

/// Fetch one blog with the same annotations as the list.
pub async fn find_blog(pool: &PgPool, viewer_id: Option<i64>, blog_id: i64) -> Result<Option<BlogRow>> {
    let sql = format!("{BLOG_SELECT} WHERE b.id = $2");

    let blog = sqlx::query_as::<_, BlogRow>(&sql)
        .bind(viewer_id)
        .bind(blog_id)
        .fetch_optional(pool)
        .await?;

    Ok(blog)
}

pub async fn create_blog(
    pool: &PgPool,
    owner_id: i64,
    title: &str,
    content: &str,
    banner: Option<&str>,
    image: Option<&str>,
) -> Result<Blog> {
    let blog = sqlx::query_as::<_, Blog>(
        r#"
        INSERT INTO blogs (owner_id, title, content, banner, image)
        VALUES ($1, $2, $3,
                COALESCE($4, '/media/defaults/blog_banner.png'),
                COALESCE($5, '/media/defaults/post.png'))
        RETURNING id, owner_id, title, content, banner, image, created_at, updated_at
        "#,
    )
    .bind(owner_id)
    .bind(title)
    .bind(content)
    .bind(banner)
    .bind(image)
    .fetch_one(pool)
    .await?;

    Ok(blog)
}

/// Update a blog's fields. Images are kept when the request omits them.
pub async fn update_blog(
    pool: &PgPool,
    blog_id: i64,
    title: &str,
    content: &str,
    banner: Option<&str>,
    image: Option<&str>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE blogs
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
    .bind(blog_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a blog; likes and comments cascade.
pub async fn delete_blog(pool: &PgPool, blog_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
        .bind(blog_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Owner lookup used by the permission check before mutating
pub async fn find_owner(pool: &PgPool, blog_id: i64) -> Result<Option<i64>> {
    let owner: Option<i64> = sqlx::query_scalar("SELECT owner_id FROM blogs WHERE id = $1")
        .bind(blog_id)
        .fetch_optional(pool)
        .await?;

    Ok(owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_whitelisted() {
        assert_eq!(order_clause(Some("-blog_likes_count")), "blog_likes_count DESC");
        assert_eq!(order_clause(Some("b.title; --")), "b.created_at DESC, b.id DESC");
    }

    #[test]
    fn annotated_select_only_joins_the_viewers_like() {
        // The only like row the query surfaces besides the counts is the
        // viewer's own, joined on their id.
        assert!(BLOG_SELECT.contains("ml.owner_id = $1"));
        assert!(BLOG_SELECT.contains("(SELECT COUNT(*) FROM blog_likes"));
    }

    #[test]
    fn followed_filter_restricts_to_the_viewers_follow_set() {
        assert!(FOLLOWED_OWNERS.contains("IN (SELECT followed_id FROM follows"));
        assert!(FOLLOWED_OWNERS.contains("owner_id = $1"));
    }
}
