//! Credential ports: password hashing and session token encoding.
//!
//! Both are synchronous; implementations are CPU-bound and hold no I/O.

use crate::identity::domain::{PasswordDigest, SessionClaims};
use thiserror::Error;

/// Errors raised by credential adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// Hashing or verification could not run (bad parameters, corrupt digest).
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// The token could not be signed.
    #[error("token signing failed: {0}")]
    Signing(String),

    /// The token signature or structure is invalid.
    #[error("invalid token: {0}")]
    InvalidToken(String),
}

/// Salted password hashing contract.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hashing`] when the hasher cannot run.
    fn hash(&self, password: &str) -> Result<PasswordDigest, CredentialError>;

    /// Verifies a plaintext password against a stored digest.
    ///
    /// Returns `Ok(false)` on mismatch. The comparison must take the same
    /// time regardless of where the inputs differ.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hashing`] when the digest is malformed.
    fn verify(&self, password: &str, digest: &PasswordDigest) -> Result<bool, CredentialError>;
}

/// Signed session token contract.
///
/// Implementations check the signature and structure only. Expiry is checked
/// by the access guard against the injected clock.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Signs the claims into a token string.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Signing`] when signing fails.
    fn encode(&self, claims: &SessionClaims) -> Result<String, CredentialError>;

    /// Verifies the signature and decodes the claims.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::InvalidToken`] when the token is malformed
    /// or the signature does not match.
    fn decode(&self, token: &str) -> Result<SessionClaims, CredentialError>;
}
