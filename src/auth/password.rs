/// Password hashing and verification using Argon2id
use crate::error::{AppError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

const MIN_PASSWORD_LEN: usize = 8;

/// Hash a password with a per-password random salt. Returns a PHC-formatted
/// string safe for database storage.
pub fn hash_password(password: &str) -> Result<String> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::ValidationError(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?
        .to_string();

    Ok(hash)
}

/// Verify a password against its stored hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("invalid stored password hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn short_password_rejected() {
        assert!(hash_password("short").is_err());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("repeatable-password").unwrap();
        let b = hash_password("repeatable-password").unwrap();
        assert_ne!(a, b);
    }
}
