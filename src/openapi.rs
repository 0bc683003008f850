/// OpenAPI documentation for the FitTribe API
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FitTribe API",
        version = "1.0.0",
        description = "Social fitness backend. Users publish blogs and workouts, follow each other, like and comment on content, organize into groups with scheduled events, and read a personalized feed of the people they follow.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Development server"),
    ),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "auth", description = "Registration, login, current user, logout"),
        (name = "profiles", description = "User profiles with relationship counts"),
        (name = "followers", description = "Follow graph management"),
        (name = "blogs", description = "Blog posts with likes and comments"),
        (name = "workouts", description = "Workouts with ordered exercise lists"),
        (name = "groups", description = "Groups, memberships, and scheduled events"),
        (name = "feed", description = "Personalized feed of followed users"),
        (name = "media", description = "Validated image uploads"),
    ),
    components(schemas(
        crate::models::Profile,
        crate::models::Follow,
        crate::models::Group,
        crate::models::Membership,
        crate::models::GroupEvent,
        crate::models::EventMembership,
        crate::models::Blog,
        crate::models::Workout,
        crate::models::WorkoutItem,
        crate::models::BlogLike,
        crate::models::WorkoutLike,
        crate::models::BlogComment,
        crate::models::WorkoutComment,
    )),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer access token"))
                        .build(),
                ),
            )
        }
    }
}
