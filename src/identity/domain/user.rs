//! User aggregate root and related identity types.

use super::{DisplayName, EmailAddress, ParseRoleError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role granted to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Creates requests and tasks, sees everything.
    Admin,
    /// Works on the tasks assigned to them.
    Tech,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Tech => "TECH",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "ADMIN" => Ok(Self::Admin),
            "TECH" => Ok(Self::Tech),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Salted password hash in PHC string format.
///
/// The digest is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wraps an encoded digest produced by a password hasher.
    #[must_use]
    pub const fn from_encoded(encoded: String) -> Self {
        Self(encoded)
    }

    /// Returns the encoded digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: DisplayName,
    email: EmailAddress,
    password: PasswordDigest,
    role: Role,
    is_active: bool,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted display name.
    pub name: DisplayName,
    /// Persisted login email.
    pub email: EmailAddress,
    /// Persisted password digest.
    pub password: PasswordDigest,
    /// Persisted role.
    pub role: Role,
    /// Persisted active flag.
    pub is_active: bool,
}

impl User {
    /// Creates a new active user.
    #[must_use]
    pub fn new(
        name: DisplayName,
        email: EmailAddress,
        password: PasswordDigest,
        role: Role,
    ) -> Self {
        Self {
            id: UserId::new(),
            name,
            email,
            password,
            role,
            is_active: true,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            email: data.email,
            password: data.password,
            role: data.role,
            is_active: data.is_active,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Returns the login email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the password digest.
    #[must_use]
    pub const fn password(&self) -> &PasswordDigest {
        &self.password
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns `true` if the user may log in and receive assignments.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns `true` if tasks may be assigned to this user right now.
    #[must_use]
    pub fn is_assignable(&self) -> bool {
        self.is_active && self.role == Role::Tech
    }

    /// Sets the active flag. Inactive users cannot log in or be assigned.
    pub const fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    /// Returns the projection sent back to clients after login.
    #[must_use]
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.as_str().to_owned(),
            email: self.email.as_str().to_owned(),
            role: self.role,
        }
    }

    /// Returns the directory projection used when picking an assignee.
    #[must_use]
    pub fn tech_summary(&self) -> TechSummary {
        TechSummary {
            id: self.id,
            name: self.name.as_str().to_owned(),
            email: self.email.as_str().to_owned(),
        }
    }
}

/// Public user projection without credentials or flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Role.
    pub role: Role,
}

/// Technician directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechSummary {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
}
