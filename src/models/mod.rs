/// Domain entities and annotated query rows
///
/// Entities mirror the storage layer one-to-one. The `*Row` structs are the
/// shapes produced by annotated list/detail queries (live engagement counts,
/// owner profile fields, the requester's own like/follow row) and are mapped
/// into response DTOs by the handlers.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User identity. Admin rights are the union of the two flags.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

/// Profile - one per user, created in the same transaction as the user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Profile {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub bio: String,
    pub profile_image: String,
    pub cover_image: String,
    pub display_name: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Follow edge - directed, unique per (owner, followed), no self-follow
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Follow {
    pub id: i64,
    pub owner_id: i64,
    pub followed_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub banner: String,
    pub group_logo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Membership join entity - unique per (user, group)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Membership {
    pub id: i64,
    pub user_id: i64,
    pub group_id: i64,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct GroupEvent {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub banner: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event attendance join entity - unique per (user, event)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct EventMembership {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Blog {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub content: String,
    pub banner: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Workout {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub content: String,
    pub banner: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ordered exercise entry owned by a workout. Items have no identity across
/// edits: updates replace the whole list.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct WorkoutItem {
    pub id: i64,
    pub workout_id: i64,
    pub exercise_name: String,
    pub quantity: i32,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct BlogLike {
    pub id: i64,
    pub owner_id: i64,
    pub blog_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct WorkoutLike {
    pub id: i64,
    pub owner_id: i64,
    pub workout_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct BlogComment {
    pub id: i64,
    pub owner_id: i64,
    pub blog_id: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct WorkoutComment {
    pub id: i64,
    pub owner_id: i64,
    pub workout_id: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================
// Annotated query rows
// ============================================

/// Blog with live engagement counts and the requester's own like id.
/// Counts are computed per request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BlogRow {
    pub id: i64,
    pub owner_id: i64,
    pub owner_username: String,
    pub profile_id: i64,
    pub profile_image: String,
    pub title: String,
    pub content: String,
    pub banner: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub blog_likes_count: i64,
    pub blog_comments_count: i64,
    pub blog_like_id: Option<i64>,
}

/// Workout with live engagement counts; items are fetched alongside.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutRow {
    pub id: i64,
    pub owner_id: i64,
    pub owner_username: String,
    pub profile_id: i64,
    pub profile_image: String,
    pub title: String,
    pub content: String,
    pub banner: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub workout_likes_count: i64,
    pub workout_comments_count: i64,
    pub workout_like_id: Option<i64>,
}

/// Profile annotated with relationship counts and the requester's follow
/// edge toward the profile owner (if any).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub owner_id: i64,
    pub owner_username: String,
    pub email: String,
    pub name: String,
    pub bio: String,
    pub profile_image: String,
    pub cover_image: String,
    pub display_name: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub blogs_count: i64,
    pub workouts_count: i64,
    pub followers_count: i64,
    pub following_count: i64,
    pub following_id: Option<i64>,
}

/// Follow edge with both usernames resolved
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FollowRow {
    pub id: i64,
    pub owner_id: i64,
    pub owner_username: String,
    pub followed_id: i64,
    pub followed_name: String,
    pub created_at: DateTime<Utc>,
}

/// Comment with owner profile fields resolved
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub owner_id: i64,
    pub owner_username: String,
    pub profile_id: i64,
    pub profile_image: String,
    pub parent_id: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Group with its member user ids aggregated
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub banner: String,
    pub group_logo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub members: Vec<i64>,
}
