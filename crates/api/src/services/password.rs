//! Password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// A stored hash could not be produced or parsed.
#[derive(Debug, Error)]
#[error("password hashing error: {0}")]
pub struct PasswordError(pub(crate) String);

/// Hashes plaintext passwords and checks them against stored hashes.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordService: Send + Sync {
    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError` if hashing fails.
    fn hash_password(&self, password: &str) -> Result<String, PasswordError>;

    /// Check `password` against a PHC-format `hash`.
    ///
    /// A mismatch is `Ok(false)`; only an unparsable hash is an error.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError` if the stored hash is malformed.
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// Argon2id with the crate's default parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordService;

impl Argon2PasswordService {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|e| PasswordError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
