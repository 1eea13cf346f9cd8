//! User directory: provisioning, activation, and technician listings.

use crate::error::ErrorKind;
use crate::identity::{
    domain::{Caller, DisplayName, EmailAddress, IdentityDomainError, Role, TechSummary, User, UserId},
    ports::{CredentialError, PasswordHasher, UserRepository, UserRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Request payload for provisioning a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionUserRequest {
    name: String,
    email: String,
    password: String,
    role: Role,
}

impl ProvisionUserRequest {
    /// Creates a request with every required field.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role,
        }
    }
}

/// Service-level errors for directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),

    /// The caller lacks the required role.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// The referenced user does not exist.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Password hashing failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

impl DirectoryError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::Repository(UserRepositoryError::DuplicateEmail(_)) => {
                ErrorKind::InvalidInput
            }
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::NotFound(_) | Self::Repository(UserRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::Credential(_) | Self::Repository(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// User directory orchestration service.
#[derive(Clone)]
pub struct UserDirectoryService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> UserDirectoryService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    /// Creates a new directory service.
    #[must_use]
    pub const fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }

    /// Creates an active user account.
    ///
    /// Used by seeding and bootstrap tooling, before any administrator can
    /// log in, so no caller is required.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Domain`] for an empty name, malformed email,
    /// or empty password, and [`DirectoryError::Repository`] with
    /// [`UserRepositoryError::DuplicateEmail`] when the email is taken.
    pub async fn provision(&self, request: ProvisionUserRequest) -> DirectoryResult<User> {
        let ProvisionUserRequest {
            name,
            email,
            password,
            role,
        } = request;

        let display_name = DisplayName::new(name)?;
        let address = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(IdentityDomainError::EmptyPassword.into());
        }
        let digest = self.hasher.hash(&password)?;

        let user = User::new(display_name, address, digest, role);
        self.users.store(&user).await?;
        tracing::info!(user_id = %user.id(), role = %role, "user provisioned");
        Ok(user)
    }

    /// Lists active technicians ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Forbidden`] unless the caller is an
    /// administrator.
    pub async fn list_active_techs(&self, caller: &Caller) -> DirectoryResult<Vec<TechSummary>> {
        if !caller.is_admin() {
            return Err(DirectoryError::Forbidden("only admin can list techs"));
        }
        let techs = self.users.list_active_by_role(Role::Tech).await?;
        tracing::debug!(count = techs.len(), "listed active techs");
        Ok(techs.iter().map(User::tech_summary).collect())
    }

    /// Enables or soft-disables a user account.
    ///
    /// Disabled users cannot log in or receive new assignments; existing
    /// assignments are kept.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Forbidden`] unless the caller is an
    /// administrator and [`DirectoryError::NotFound`] when the user does not
    /// exist.
    pub async fn set_active(
        &self,
        caller: &Caller,
        user_id: UserId,
        active: bool,
    ) -> DirectoryResult<User> {
        if !caller.is_admin() {
            return Err(DirectoryError::Forbidden("only admin can change user status"));
        }
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DirectoryError::NotFound(user_id))?;
        user.set_active(active);
        self.users.update(&user).await?;
        tracing::info!(user_id = %user_id, active, "user activity changed");
        Ok(user)
    }
}
