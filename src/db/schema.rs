use sqlx::PgPool;
use tracing::info;

use crate::error::Result;

/// Ensure all tables exist.
///
/// Uniqueness constraints live here, not in application checks: two
/// concurrent identical follow/like/join requests race on the unique pair
/// and exactly one insert wins. Run lazily at service startup so fresh
/// environments come up without a separate migration step.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    info!("Ensuring database schema exists");

    for ddl in [
        USERS_TABLE,
        PROFILES_TABLE,
        FOLLOWS_TABLE,
        GROUPS_TABLE,
        MEMBERSHIPS_TABLE,
        GROUP_EVENTS_TABLE,
        EVENT_MEMBERSHIPS_TABLE,
        BLOGS_TABLE,
        WORKOUTS_TABLE,
        WORKOUT_ITEMS_TABLE,
        BLOG_LIKES_TABLE,
        WORKOUT_LIKES_TABLE,
        BLOG_COMMENTS_TABLE,
        WORKOUT_COMMENTS_TABLE,
    ] {
        sqlx::query(ddl).execute(pool).await?;
    }

    // Feed queries filter on owner and sort on creation time.
    for ddl in [
        "CREATE INDEX IF NOT EXISTS idx_blogs_owner_created ON blogs (owner_id, created_at DESC)",
        "CREATE INDEX IF NOT EXISTS idx_workouts_owner_created ON workouts (owner_id, created_at DESC)",
        "CREATE INDEX IF NOT EXISTS idx_blog_comments_blog ON blog_comments (blog_id)",
        "CREATE INDEX IF NOT EXISTS idx_workout_comments_workout ON workout_comments (workout_id)",
        "CREATE INDEX IF NOT EXISTS idx_group_events_group ON group_events (group_id)",
    ] {
        sqlx::query(ddl).execute(pool).await?;
    }

    Ok(())
}

const USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL DEFAULT '',
    password_hash TEXT NOT NULL,
    is_staff BOOLEAN NOT NULL DEFAULT FALSE,
    is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const PROFILES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS profiles (
    id BIGSERIAL PRIMARY KEY,
    owner_id BIGINT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL DEFAULT '',
    bio TEXT NOT NULL DEFAULT '',
    profile_image TEXT NOT NULL DEFAULT '/media/defaults/profile.png',
    cover_image TEXT NOT NULL DEFAULT '/media/defaults/cover.png',
    display_name BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const FOLLOWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS follows (
    id BIGSERIAL PRIMARY KEY,
    owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    followed_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (owner_id, followed_id),
    CHECK (owner_id <> followed_id)
)
"#;

const GROUPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS groups (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    banner TEXT NOT NULL DEFAULT '/media/defaults/cover.png',
    group_logo TEXT NOT NULL DEFAULT '/media/defaults/logo.png',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const MEMBERSHIPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS memberships (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    group_id BIGINT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
    joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (user_id, group_id)
)
"#;

const GROUP_EVENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS group_events (
    id BIGSERIAL PRIMARY KEY,
    group_id BIGINT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    location TEXT NOT NULL DEFAULT '',
    starts_at TIMESTAMPTZ NOT NULL,
    ends_at TIMESTAMPTZ NOT NULL,
    banner TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const EVENT_MEMBERSHIPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS event_memberships (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    event_id BIGINT NOT NULL REFERENCES group_events(id) ON DELETE CASCADE,
    joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (user_id, event_id)
)
"#;

const BLOGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS blogs (
    id BIGSERIAL PRIMARY KEY,
    owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    content TEXT NOT NULL DEFAULT '',
    banner TEXT NOT NULL DEFAULT '/media/defaults/blog_banner.png',
    image TEXT NOT NULL DEFAULT '/media/defaults/post.png',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const WORKOUTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS workouts (
    id BIGSERIAL PRIMARY KEY,
    owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    content TEXT NOT NULL DEFAULT '',
    banner TEXT NOT NULL DEFAULT '/media/defaults/workout_banner.png',
    image TEXT NOT NULL DEFAULT '/media/defaults/post.png',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const WORKOUT_ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS workout_items (
    id BIGSERIAL PRIMARY KEY,
    workout_id BIGINT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
    exercise_name TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    position INTEGER NOT NULL
)
"#;

const BLOG_LIKES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS blog_likes (
    id BIGSERIAL PRIMARY KEY,
    owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    blog_id BIGINT NOT NULL REFERENCES blogs(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (owner_id, blog_id)
)
"#;

const WORKOUT_LIKES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS workout_likes (
    id BIGSERIAL PRIMARY KEY,
    owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    workout_id BIGINT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (owner_id, workout_id)
)
"#;

const BLOG_COMMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS blog_comments (
    id BIGSERIAL PRIMARY KEY,
    owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    blog_id BIGINT NOT NULL REFERENCES blogs(id) ON DELETE CASCADE,
    comment TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const WORKOUT_COMMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS workout_comments (
    id BIGSERIAL PRIMARY KEY,
    owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    workout_id BIGINT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
    comment TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;
