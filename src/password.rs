//! Password hashing and verification.
//!
//! Hashes are Argon2id PHC strings with a per-password random salt.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Errors that can occur while hashing or verifying a password.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Hashing failed internally (e.g. no randomness available).
    #[error("failed to hash password: {0}")]
    Hashing(String),
    /// The password does not match the stored hash.
    #[error("password does not match")]
    Mismatch,
}

/// Hash a plaintext password with the default Argon2id parameters.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// Verify a plaintext password against a stored hash.
///
/// A stored hash that cannot be parsed is reported as a mismatch.
pub fn verify_password(hash: &str, password: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::Mismatch)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}
