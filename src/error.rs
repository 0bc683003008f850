/// Error types for the FitTribe API
///
/// One error enum for the whole service; every variant maps to an HTTP
/// response so handlers can return `Result<HttpResponse>` and let actix
/// shape the failure body.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, AppError>;

/// PostgreSQL error codes we translate instead of surfacing as 500s.
const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
const PG_CHECK_VIOLATION: &str = "23514";

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input or an image constraint violation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Duplicate like/follow/membership. The message stays generic on
    /// purpose: callers must not learn which unique constraint fired.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No or invalid identity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Policy predicate failed
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Missing id, or missing membership to leave
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request outside field validation
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Unexpected internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // Duplicates surface as 400 with a generic body, matching the
            // validation-style contract the API has always exposed.
            AppError::ValidationError(_) | AppError::Conflict(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => {
                    return AppError::Conflict("already exists".to_string());
                }
                Some(PG_FOREIGN_KEY_VIOLATION) => {
                    return AppError::NotFound("referenced record does not exist".to_string());
                }
                Some(PG_CHECK_VIOLATION) => {
                    return AppError::ValidationError("constraint violated".to_string());
                }
                _ => {}
            }
        }
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".to_string()),
            other => AppError::DatabaseError(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_bad_request() {
        let err = AppError::Conflict("already exists".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn taxonomy_status_codes() {
        assert_eq!(
            AppError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DatabaseError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn conflict_body_does_not_name_the_constraint() {
        let err = AppError::Conflict("already exists".to_string());
        let body = err.to_string();
        assert!(!body.contains("unique"));
        assert!(!body.contains("follows"));
        assert!(!body.contains("likes"));
    }
}
