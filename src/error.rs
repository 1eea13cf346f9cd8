//! Error taxonomy shared by every service.
//!
//! Each service error exposes a `kind()` accessor returning an [`ErrorKind`],
//! so callers at the outer edge can pick a status code or message class
//! without matching on every variant of every context.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or malformed input the caller can correct.
    InvalidInput,
    /// The caller is authenticated but not permitted to act.
    Forbidden,
    /// The caller presented no valid credential.
    Unauthorized,
    /// A referenced request, task, or user does not exist.
    NotFound,
    /// Reserved for concurrent-modification detection. Never produced today.
    Conflict,
    /// Infrastructure failure (storage, hashing, token signing).
    Internal,
}

impl ErrorKind {
    /// Returns the canonical name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::Forbidden => "forbidden",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }

    /// Returns `true` when the caller can fix the failure by changing input
    /// or credentials.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        !matches!(self, Self::Internal)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
