/// Auth handlers - registration, login, current user, logout
use actix_web::cookie::time::OffsetDateTime;
use actix_web::cookie::Cookie;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::auth::{jwt, password};
use crate::config::Config;
use crate::db;
use crate::error::{AppError, Result};
use crate::middleware::Actor;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub profile_id: i64,
}

#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub profile_id: i64,
    pub profile_image: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Register a new user. The profile is created in the same transaction so
/// no user ever exists without one.
pub async fn register(
    pool: web::Data<PgPool>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;
    let (user, profile) =
        db::users::create_user_with_profile(&pool, &req.username, &req.email, &password_hash)
            .await?;

    tracing::info!(user_id = user.id, username = %user.username, "user registered");

    Ok(HttpResponse::Created().json(RegisterResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        profile_id: profile.id,
    }))
}

/// Log in and issue an access/refresh token pair. Tokens are returned in
/// the body and mirrored into httponly cookies.
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let user = db::users::find_by_username(&pool, &req.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let tokens =
        jwt::generate_token_pair(user.id, &user.username, user.is_staff, user.is_superuser)?;

    tracing::info!(user_id = user.id, "user logged in");

    let auth = &config.auth;
    let access_cookie = Cookie::build(auth.auth_cookie.clone(), tokens.access_token.clone())
        .path("/")
        .http_only(true)
        .secure(auth.cookie_secure)
        .finish();
    let refresh_cookie = Cookie::build(auth.refresh_cookie.clone(), tokens.refresh_token.clone())
        .path("/")
        .http_only(true)
        .secure(auth.cookie_secure)
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .json(tokens))
}

/// Current authenticated user, with the profile fields clients render in
/// navigation chrome.
pub async fn current_user(pool: web::Data<PgPool>, actor: Actor) -> Result<HttpResponse> {
    let user = db::users::find_by_id(&pool, actor.id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
    let profile = db::profiles::find_by_owner(&pool, actor.id, actor.id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile not found".to_string()))?;

    Ok(HttpResponse::Ok().json(CurrentUserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        profile_id: profile.id,
        profile_image: profile.profile_image,
        is_staff: user.is_staff,
        is_superuser: user.is_superuser,
    }))
}

/// Log out by expiring both auth cookies. Tokens themselves stay valid
/// until expiry; the server keeps no session state to revoke.
pub async fn logout(config: web::Data<Config>) -> Result<HttpResponse> {
    let auth = &config.auth;

    let expired = |name: &str| {
        Cookie::build(name.to_string(), "")
            .path("/")
            .http_only(true)
            .secure(auth.cookie_secure)
            .expires(OffsetDateTime::UNIX_EPOCH)
            .finish()
    };

    Ok(HttpResponse::Ok()
        .cookie(expired(&auth.auth_cookie))
        .cookie(expired(&auth.refresh_cookie))
        .json(serde_json::json!({ "detail": "Successfully logged out." })))
}

/// Root route
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the FitTribe Backend API"
    }))
}
