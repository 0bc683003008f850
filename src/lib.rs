/// FitTribe API library
///
/// Social fitness backend: blogs and workouts published by users, a follow
/// graph feeding a personalized timeline, likes and comments, groups with
/// scheduled events, and validated image uploads.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route registration
/// - `models`: Entities and annotated query rows
/// - `services`: Feed assembly and media validation/storage
/// - `db`: Repository functions and schema bootstrap
/// - `auth`: JWT issuance/validation and password hashing
/// - `middleware`: Identity extractors and authorization policies
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
