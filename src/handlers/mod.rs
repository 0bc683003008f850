/// HTTP handlers and route registration
pub mod auth;
pub mod blogs;
pub mod comments;
pub mod events;
pub mod feed;
pub mod followers;
pub mod groups;
pub mod likes;
pub mod media;
pub mod profiles;
pub mod workouts;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Limit/offset pagination shared by every list endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "healthy" }))
}

/// Register every route on the app.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(auth::root))
        .route("/health", web::get().to(health))
        // auth
        .service(
            web::scope("/auth")
                .route("/register/", web::post().to(auth::register))
                .route("/login/", web::post().to(auth::login))
                .route("/user/", web::get().to(auth::current_user))
                .route("/logout/", web::post().to(auth::logout)),
        )
        // profiles
        .service(
            web::scope("/profiles")
                .route("/", web::get().to(profiles::list_profiles))
                .route("/{id}/", web::get().to(profiles::get_profile))
                .route("/{id}/", web::put().to(profiles::update_profile)),
        )
        // follower graph
        .service(
            web::scope("/followers")
                .route("/", web::get().to(followers::list_follows))
                .route("/", web::post().to(followers::create_follow))
                .route("/{id}/", web::get().to(followers::get_follow))
                .route("/{id}/", web::delete().to(followers::delete_follow)),
        )
        // content
        .service(
            web::scope("/blogs")
                .route("/", web::get().to(blogs::list_blogs))
                .route("/", web::post().to(blogs::create_blog))
                .route("/{id}/", web::get().to(blogs::get_blog))
                .route("/{id}/", web::put().to(blogs::update_blog))
                .route("/{id}/", web::delete().to(blogs::delete_blog)),
        )
        .service(
            web::scope("/workouts")
                .route("/", web::get().to(workouts::list_workouts))
                .route("/", web::post().to(workouts::create_workout))
                .route("/{id}/", web::get().to(workouts::get_workout))
                .route("/{id}/", web::put().to(workouts::update_workout))
                .route("/{id}/", web::delete().to(workouts::delete_workout)),
        )
        // engagement
        .service(
            web::scope("/blog-likes")
                .route("/", web::get().to(likes::list_blog_likes))
                .route("/", web::post().to(likes::create_blog_like))
                .route("/{id}/", web::get().to(likes::get_blog_like))
                .route("/{id}/", web::delete().to(likes::delete_blog_like)),
        )
        .service(
            web::scope("/workout-likes")
                .route("/", web::get().to(likes::list_workout_likes))
                .route("/", web::post().to(likes::create_workout_like))
                .route("/{id}/", web::get().to(likes::get_workout_like))
                .route("/{id}/", web::delete().to(likes::delete_workout_like)),
        )
        .service(
            web::scope("/blog-comments")
                .route("/", web::get().to(comments::list_blog_comments))
                .route("/", web::post().to(comments::create_blog_comment))
                .route("/{id}/", web::get().to(comments::get_blog_comment))
                .route("/{id}/", web::put().to(comments::update_blog_comment))
                .route("/{id}/", web::delete().to(comments::delete_blog_comment)),
        )
        .service(
            web::scope("/workout-comments")
                .route("/", web::get().to(comments::list_workout_comments))
                .route("/", web::post().to(comments::create_workout_comment))
                .route("/{id}/", web::get().to(comments::get_workout_comment))
                .route("/{id}/", web::put().to(comments::update_workout_comment))
                .route("/{id}/", web::delete().to(comments::delete_workout_comment)),
        )
        // groups & events
        .service(
            web::scope("/groups")
                .route("/", web::get().to(groups::list_groups))
                .route("/", web::post().to(groups::create_group))
                .route("/{id}/", web::get().to(groups::get_group))
                .route("/{id}/", web::put().to(groups::update_group))
                .route("/{id}/", web::delete().to(groups::delete_group))
                .route("/{id}/join/", web::post().to(groups::join_group))
                .route("/{id}/leave/", web::post().to(groups::leave_group)),
        )
        .route("/memberships/", web::get().to(groups::list_memberships))
        .service(
            web::scope("/group-events")
                .route("/", web::get().to(events::list_events))
                .route("/", web::post().to(events::create_event))
                .route("/{id}/", web::get().to(events::get_event))
                .route("/{id}/", web::put().to(events::update_event))
                .route("/{id}/", web::delete().to(events::delete_event))
                .route("/{id}/join/", web::post().to(events::join_event))
                .route("/{id}/leave/", web::post().to(events::leave_event)),
        )
        // feed & media
        .route("/feed/", web::get().to(feed::get_feed))
        .route("/media/{kind}/", web::post().to(media::upload));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let page = Pagination {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(page.limit(), MAX_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn pagination_defaults() {
        let page = Pagination {
            limit: None,
            offset: None,
        };
        assert_eq!(page.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }
}
