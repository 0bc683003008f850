//! Personalized feed assembly.
//!
//! The feed is the union of blogs and workouts owned by the users the
//! requester follows, interleaved newest first. Engagement counts are
//! computed live by the underlying queries; nothing here is cached.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::db;
use crate::error::Result;
use crate::models::{BlogRow, WorkoutItem, WorkoutRow};

/// One entry in the merged feed.
#[derive(Debug, Clone)]
pub enum FeedEntry {
    Blog(BlogRow),
    Workout(WorkoutRow, Vec<WorkoutItem>),
}

impl FeedEntry {
    fn created_at(&self) -> DateTime<Utc> {
        match self {
            FeedEntry::Blog(b) => b.created_at,
            FeedEntry::Workout(w, _) => w.created_at,
        }
    }

    fn id(&self) -> i64 {
        match self {
            FeedEntry::Blog(b) => b.id,
            FeedEntry::Workout(w, _) => w.id,
        }
    }
}

/// Build the feed for one user: both content queries are scoped to the
/// followed set, then merged by (created_at DESC, id DESC). An empty follow
/// set yields an empty feed without special-casing.
pub async fn build_feed(pool: &PgPool, viewer_id: i64) -> Result<Vec<FeedEntry>> {
    let blogs = db::blogs::list_followed_blogs(pool, viewer_id).await?;
    let workouts = db::workouts::list_followed_workouts(pool, viewer_id).await?;

    let workout_ids: Vec<i64> = workouts.iter().map(|w| w.id).collect();
    let mut items = db::workouts::get_items_batch(pool, &workout_ids).await?;

    let mut feed: Vec<FeedEntry> = Vec::with_capacity(blogs.len() + workouts.len());
    feed.extend(blogs.into_iter().map(FeedEntry::Blog));
    feed.extend(workouts.into_iter().map(|w| {
        let workout_items = items.remove(&w.id).unwrap_or_default();
        FeedEntry::Workout(w, workout_items)
    }));

    feed.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then(b.id().cmp(&a.id()))
    });

    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blog(id: i64, ts: &str) -> FeedEntry {
        FeedEntry::Blog(BlogRow {
            id,
            owner_id: 1,
            owner_username: "ann".into(),
            profile_id: 1,
            profile_image: "/media/defaults/avatar.png".into(),
            title: "t".into(),
            content: "c".into(),
            banner: "/media/defaults/blog_banner.png".into(),
            image: "/media/defaults/post.png".into(),
            created_at: ts.parse().unwrap(),
            updated_at: ts.parse().unwrap(),
            blog_likes_count: 0,
            blog_comments_count: 0,
            blog_like_id: None,
        })
    }

    fn workout(id: i64, ts: &str) -> FeedEntry {
        FeedEntry::Workout(
            WorkoutRow {
                id,
                owner_id: 1,
                owner_username: "ann".into(),
                profile_id: 1,
                profile_image: "/media/defaults/avatar.png".into(),
                title: "t".into(),
                content: "c".into(),
                banner: "/media/defaults/workout_banner.png".into(),
                image: "/media/defaults/post.png".into(),
                created_at: ts.parse().unwrap(),
                updated_at: ts.parse().unwrap(),
                workout_likes_count: 0,
                workout_comments_count: 0,
                workout_like_id: None,
            },
            Vec::new(),
        )
    }

    fn sort(mut feed: Vec<FeedEntry>) -> Vec<i64> {
        feed.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then(b.id().cmp(&a.id()))
        });
        feed.iter().map(FeedEntry::id).collect()
    }

    #[test]
    fn newest_entries_come_first_across_content_types() {
        let ids = sort(vec![
            blog(1, "2026-03-01T10:00:00Z"),
            workout(2, "2026-03-01T12:00:00Z"),
            blog(3, "2026-03-01T11:00:00Z"),
        ]);
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn equal_timestamps_break_ties_by_id_descending() {
        let ids = sort(vec![
            blog(4, "2026-03-01T10:00:00Z"),
            blog(9, "2026-03-01T10:00:00Z"),
            workout(7, "2026-03-01T10:00:00Z"),
        ]);
        assert_eq!(ids, vec![9, 7, 4]);
    }
}
