//! Lifecycle engine errors.

use crate::error::ErrorKind;
use crate::identity::ports::UserRepositoryError;
use crate::maintenance::{
    domain::{MaintenanceDomainError, RequestId, TaskId},
    ports::MaintenanceRepositoryError,
};
use thiserror::Error;

/// Service-level errors for lifecycle operations.
#[derive(Debug, Error)]
pub enum MaintenanceServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] MaintenanceDomainError),

    /// The caller's role or ownership does not permit the operation.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// The referenced request does not exist.
    #[error("request not found: {0}")]
    RequestNotFound(RequestId),

    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Request or task storage failed.
    #[error(transparent)]
    Repository(#[from] MaintenanceRepositoryError),

    /// User lookup failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
}

impl MaintenanceServiceError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::InvalidInput,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::RequestNotFound(_)
            | Self::TaskNotFound(_)
            | Self::Repository(MaintenanceRepositoryError::RequestNotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::Repository(_) | Self::Users(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for lifecycle operations.
pub type MaintenanceServiceResult<T> = Result<T, MaintenanceServiceError>;
