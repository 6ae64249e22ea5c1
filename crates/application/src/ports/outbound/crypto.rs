//! Interfaces for cryptographic operations.

use domain::auth::password::{Password, PasswordHash};

use crate::error::Result;

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hash a password using a secure algorithm.
    fn hash(&self, password: &Password) -> Result<PasswordHash>;

    /// Verify a password against a stored hash.
    ///
    /// A mismatch is reported as `DomainError::InvalidCredentials`.
    fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<()>;
}
