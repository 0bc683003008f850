/// JWT issuance and validation
///
/// HS256 with a single secret loaded from the environment at startup. Keys
/// are initialized once and immutable afterwards; `OnceCell` makes the
/// initialization thread-safe without runtime locks.
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 1;
const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 30;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims - standard claims plus the identity fields handlers need so
/// that request extraction never hits the database.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id, decimal string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access" or "refresh"
    pub token_type: String,
    /// Username
    pub username: String,
    /// Staff flag (admin policy input)
    pub is_staff: bool,
    /// Superuser flag (admin policy input)
    pub is_superuser: bool,
}

/// Token pair returned by login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

static JWT_ENCODING_KEY: OnceCell<EncodingKey> = OnceCell::new();
static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

/// Initialize the JWT secret. Must be called during startup before any
/// token operation; can only succeed once.
pub fn initialize_jwt_secret(secret: &str) -> Result<()> {
    if secret.len() < 32 {
        return Err(anyhow!("JWT secret must be at least 32 bytes"));
    }
    JWT_ENCODING_KEY
        .set(EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|_| anyhow!("JWT keys already initialized"))?;
    JWT_DECODING_KEY
        .set(DecodingKey::from_secret(secret.as_bytes()))
        .map_err(|_| anyhow!("JWT keys already initialized"))?;
    Ok(())
}

fn encoding_key() -> Result<&'static EncodingKey> {
    JWT_ENCODING_KEY
        .get()
        .ok_or_else(|| anyhow!("JWT keys not initialized"))
}

fn decoding_key() -> Result<&'static DecodingKey> {
    JWT_DECODING_KEY
        .get()
        .ok_or_else(|| anyhow!("JWT keys not initialized"))
}

fn generate_token(
    user_id: i64,
    username: &str,
    is_staff: bool,
    is_superuser: bool,
    token_type: &str,
    lifetime: Duration,
) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
        token_type: token_type.to_string(),
        username: username.to_string(),
        is_staff,
        is_superuser,
    };

    encode(&Header::new(JWT_ALGORITHM), &claims, encoding_key()?)
        .map_err(|e| anyhow!("failed to encode token: {e}"))
}

/// Generate an access/refresh token pair for a user.
pub fn generate_token_pair(
    user_id: i64,
    username: &str,
    is_staff: bool,
    is_superuser: bool,
) -> Result<TokenResponse> {
    let access_token = generate_token(
        user_id,
        username,
        is_staff,
        is_superuser,
        "access",
        Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS),
    )?;
    let refresh_token = generate_token(
        user_id,
        username,
        is_staff,
        is_superuser,
        "refresh",
        Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
    )?;

    Ok(TokenResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: ACCESS_TOKEN_EXPIRY_HOURS * 3600,
    })
}

/// Validate a token and return its claims. Expiry is enforced by the
/// jsonwebtoken validation; token_type is the caller's concern.
pub fn validate_token(token: &str) -> Result<Claims> {
    let validation = Validation::new(JWT_ALGORITHM);
    let data = decode::<Claims>(token, decoding_key()?, &validation)
        .map_err(|e| anyhow!("invalid token: {e}"))?;
    Ok(data.claims)
}

#[cfg(test)]
pub(crate) fn ensure_test_keys() {
    // Multiple test functions share process-global keys; the second init
    // attempt is expected to fail.
    let _ = initialize_jwt_secret("test-secret-test-secret-test-secret!");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trip() {
        ensure_test_keys();
        let pair = generate_token_pair(42, "alice", false, false).unwrap();
        let claims = validate_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.token_type, "access");
        assert!(!claims.is_staff);
    }

    #[test]
    fn refresh_token_carries_type() {
        ensure_test_keys();
        let pair = generate_token_pair(7, "bob", true, false).unwrap();
        let claims = validate_token(&pair.refresh_token).unwrap();
        assert_eq!(claims.token_type, "refresh");
        assert!(claims.is_staff);
    }

    #[test]
    fn garbage_token_is_rejected() {
        ensure_test_keys();
        assert!(validate_token("not-a-token").is_err());
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(initialize_jwt_secret("short").is_err());
    }
}
