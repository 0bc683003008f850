pub mod blogs;
pub mod comments;
pub mod events;
pub mod follows;
pub mod groups;
pub mod likes;
pub mod profiles;
pub mod schema;
pub mod users;
pub mod workouts;
