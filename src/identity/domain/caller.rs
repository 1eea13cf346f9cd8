//! Session claims and the authenticated caller context.

use super::{Role, User, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried inside a signed session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the authenticated user.
    pub sub: UserId,
    /// Role at the time the token was issued.
    pub role: Role,
    /// Display name at the time the token was issued.
    pub name: String,
    /// Login email at the time the token was issued.
    pub email: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl SessionClaims {
    /// Builds claims for `user`, valid for `ttl` from `issued_at`.
    #[must_use]
    pub fn for_user(user: &User, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: user.id(),
            role: user.role(),
            name: user.name().as_str().to_owned(),
            email: user.email().as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// Returns `true` if the claims have expired at `now`, allowing
    /// `leeway_secs` of clock skew.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, leeway_secs: i64) -> bool {
        self.exp.saturating_add(leeway_secs) <= now.timestamp()
    }
}

/// Identity of the caller of a protected operation.
///
/// Only [`crate::identity::services::AccessGuard::authorize`] produces a
/// `Caller`, so holding one means a token was verified. Role checks are made
/// per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Caller {
    subject: UserId,
    role: Role,
}

impl Caller {
    pub(crate) const fn new(subject: UserId, role: Role) -> Self {
        Self { subject, role }
    }

    /// Returns the authenticated user identifier.
    #[must_use]
    pub const fn subject(&self) -> UserId {
        self.subject
    }

    /// Returns the authenticated role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns `true` for administrators.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Returns `true` for technicians.
    #[must_use]
    pub const fn is_tech(&self) -> bool {
        matches!(self.role, Role::Tech)
    }
}

