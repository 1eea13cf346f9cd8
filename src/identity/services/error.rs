//! Authentication and authorization errors.

use crate::error::ErrorKind;
use crate::identity::ports::{CredentialError, UserRepositoryError};
use std::fmt;
use thiserror::Error;

/// Why a presented token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedReason {
    /// No token was presented.
    MissingToken,
    /// The token is malformed or its signature does not match.
    InvalidToken,
    /// The token has expired.
    Expired,
}

impl fmt::Display for UnauthorizedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingToken => "missing token",
            Self::InvalidToken => "invalid token",
            Self::Expired => "token expired",
        })
    }
}

/// Errors raised by login and token verification.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password was not supplied.
    #[error("email and password are required")]
    MissingCredentials,

    /// Unknown email, inactive account, or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The presented token was refused.
    #[error("unauthorized: {0}")]
    Unauthorized(UnauthorizedReason),

    /// Hashing or signing failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// User lookup failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

impl AuthError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredentials => ErrorKind::InvalidInput,
            Self::InvalidCredentials | Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Credential(_) | Self::Repository(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
