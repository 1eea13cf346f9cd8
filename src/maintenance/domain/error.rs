//! Error types for maintenance domain validation and parsing.

use crate::identity::domain::UserId;
use thiserror::Error;

/// Errors returned while constructing or validating maintenance values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MaintenanceDomainError {
    /// The request title is empty after trimming.
    #[error("request title must not be empty")]
    EmptyRequestTitle,

    /// The request description is empty after trimming.
    #[error("request description must not be empty")]
    EmptyRequestDescription,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// The assignee is missing, not a technician, or inactive.
    #[error("user {0} is not an active technician")]
    InvalidAssignee(UserId),

    /// The due date is neither `YYYY-MM-DD` nor RFC 3339.
    #[error("invalid due date '{0}', expected YYYY-MM-DD or RFC 3339")]
    InvalidDueDate(String),

    /// A status or priority name is unknown.
    #[error(transparent)]
    UnknownValue(#[from] ParseStatusError),
}

/// Error returned while parsing a status or priority name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {field}: {value}")]
pub struct ParseStatusError {
    /// Which enumeration was being parsed.
    pub field: &'static str,
    /// The rejected value.
    pub value: String,
}

impl ParseStatusError {
    pub(crate) fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_owned(),
        }
    }
}
