/// Password Hashing and Verification
///
/// bcrypt with a per-deployment cost. Both operations are CPU-bound on purpose;
/// async callers use the `_blocking` variants which move the work onto the
/// blocking thread pool.

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hashing(#[source] BcryptError),
    /// The normal "wrong password" outcome.
    #[error("password does not match")]
    Mismatch,
    #[error("password verification failed: {0}")]
    Verification(#[source] BcryptError),
    #[error("password worker failed: {0}")]
    Worker(String),
}

/// Hashes and verifies user passwords
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    cost: u32,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl CredentialHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password; the salt is embedded in the returned string, so the
    /// same input produces a different hash on every call.
    ///
    /// # Errors
    /// Returns `PasswordError::Hashing` if bcrypt fails (invalid cost, RNG failure)
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        hash(password, self.cost).map_err(PasswordError::Hashing)
    }

    /// Verify a password against its stored hash
    ///
    /// # Errors
    /// Returns `PasswordError::Mismatch` for a wrong password and
    /// `PasswordError::Verification` when the stored hash cannot be used.
    pub fn verify(&self, password_hash: &str, password: &str) -> Result<(), PasswordError> {
        match verify(password, password_hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::Verification(e)),
        }
    }

    pub async fn hash_blocking(&self, password: String) -> Result<String, PasswordError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::Worker(e.to_string()))?
    }

    pub async fn verify_blocking(
        &self,
        password_hash: String,
        password: String,
    ) -> Result<(), PasswordError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&password_hash, &password))
            .await
            .map_err(|e| PasswordError::Worker(e.to_string()))?
    }
}
