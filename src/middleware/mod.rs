/// Request identity extractors
///
/// `Actor` is the authenticated requester, pulled from the Bearer token on
/// each request. `MaybeActor` is its optional counterpart for read-open
/// routes that still annotate responses with the viewer's own likes and
/// follows.
pub mod permissions;

use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpRequest};

use crate::auth::jwt;
use crate::error::AppError;

/// Authenticated requester resolved from a valid access token.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: i64,
    pub username: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

fn actor_from_request(req: &HttpRequest) -> Result<Option<Actor>, AppError> {
    let header = match req.headers().get("Authorization") {
        Some(h) => h,
        None => return Ok(None),
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".to_string()))?;

    let claims = jwt::validate_token(token)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;
    if claims.token_type != "access" {
        return Err(AppError::Unauthorized(
            "Refresh tokens cannot be used for authentication".to_string(),
        ));
    }

    let id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

    Ok(Some(Actor {
        id,
        username: claims.username,
        is_staff: claims.is_staff,
        is_superuser: claims.is_superuser,
    }))
}

impl FromRequest for Actor {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = match actor_from_request(req) {
            Ok(Some(actor)) => Ok(actor),
            Ok(None) => Err(AppError::Unauthorized(
                "Authentication credentials were not provided".to_string(),
            )),
            Err(e) => Err(e),
        };
        ready(result)
    }
}

/// Optional requester for read-open routes. A missing header is anonymous;
/// a present but invalid token is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeActor(pub Option<Actor>);

impl MaybeActor {
    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|a| a.id)
    }
}

impl FromRequest for MaybeActor {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(actor_from_request(req).map(MaybeActor))
    }
}
