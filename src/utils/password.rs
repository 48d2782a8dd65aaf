//! Password hashing with Argon2id.
//!
//! Hashing and verification are deliberately slow, so both run on tokio's
//! blocking pool and never occupy a request worker thread. Hashes are PHC
//! strings (`$argon2id$v=19$...`); plaintext is never stored or logged.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde_json::json;

use crate::error::AppError;

/// Hashes `password` with a fresh random salt.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if hashing fails or the blocking task panics.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();

    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                AppError::internal("Failed to hash password", json!({}))
            })
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Password hashing task failed");
        AppError::internal("Failed to hash password", json!({}))
    })?
}

/// Checks `password` against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the stored hash cannot be parsed.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let hash = hash.to_owned();

    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash).map_err(|e| {
            tracing::error!(error = %e, "Stored password hash is malformed");
            AppError::internal("Failed to verify password", json!({}))
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Password verification task failed");
        AppError::internal("Failed to verify password", json!({}))
    })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("correct horse").await.unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).await.unwrap());
        assert!(!verify_password("wrong horse", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hash_is_salted() {
        let a = hash_password("same").await.unwrap();
        let b = hash_password("same").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_verify_malformed_hash_is_error() {
        let result = verify_password("anything", "not-a-phc-string").await;
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }
}
