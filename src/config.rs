/// Configuration management for the FitTribe API
///
/// Loads configuration from environment variables.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Auth/JWT configuration
    pub auth: AuthConfig,
    /// Media storage configuration
    pub media: MediaConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Min connections in pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Auth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for JWT signing/validation
    pub jwt_secret: String,
    /// Name of the access-token cookie cleared on logout
    #[serde(default = "default_auth_cookie")]
    pub auth_cookie: String,
    /// Name of the refresh-token cookie cleared on logout
    #[serde(default = "default_refresh_cookie")]
    pub refresh_cookie: String,
    /// Whether cookies are marked Secure
    #[serde(default)]
    pub cookie_secure: bool,
}

/// Media storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory where uploaded images are written
    #[serde(default = "default_media_root")]
    pub root: String,
    /// Public base URL prefixed to stored keys
    #[serde(default = "default_media_base_url")]
    pub base_url: String,
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_auth_cookie() -> String {
    "ft-auth".to_string()
}

fn default_refresh_cookie() -> String {
    "ft-refresh".to_string()
}

fn default_media_root() -> String {
    "media".to_string()
}

fn default_media_base_url() -> String {
    "/media".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
        };

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .context("DATABASE_URL environment variable not set")?,
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_max_connections),
            min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_min_connections),
        };

        let auth = AuthConfig {
            jwt_secret: std::env::var("JWT_SECRET")
                .context("JWT_SECRET environment variable not set")?,
            auth_cookie: std::env::var("JWT_AUTH_COOKIE").unwrap_or_else(|_| default_auth_cookie()),
            refresh_cookie: std::env::var("JWT_AUTH_REFRESH_COOKIE")
                .unwrap_or_else(|_| default_refresh_cookie()),
            cookie_secure: std::env::var("JWT_AUTH_SECURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        };

        let media = MediaConfig {
            root: std::env::var("MEDIA_ROOT").unwrap_or_else(|_| default_media_root()),
            base_url: std::env::var("MEDIA_BASE_URL").unwrap_or_else(|_| default_media_base_url()),
        };

        Ok(Config {
            app,
            database,
            auth,
            media,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        assert_eq!(default_max_connections(), 20);
        assert_eq!(default_min_connections(), 5);
        assert_eq!(default_auth_cookie(), "ft-auth");
        assert_eq!(default_refresh_cookie(), "ft-refresh");
    }
}
