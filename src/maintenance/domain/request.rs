//! Request aggregate root, priority, and request status.

use super::{MaintenanceDomainError, ParseStatusError, RequestId, RequestSummary};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Urgency of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal urgency.
    #[default]
    Medium,
    /// Should be handled soon.
    High,
    /// Needs immediate attention.
    Critical,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(ParseStatusError::new("priority", value)),
        }
    }
}

/// Request lifecycle status. Derived from the request's tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// Created, no assigned task yet.
    Open,
    /// At least one task was assigned, or a task was reopened.
    Assigned,
    /// Every task is done.
    Done,
}

impl RequestStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Assigned => "ASSIGNED",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RequestStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "ASSIGNED" => Ok(Self::Assigned),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseStatusError::new("request status", value)),
        }
    }
}

/// Input for opening a new request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    title: String,
    description: String,
    location: Option<String>,
    area: Option<String>,
    priority: Priority,
}

impl NewRequest {
    /// Creates input with the required fields and medium priority.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            location: None,
            area: None,
            priority: Priority::default(),
        }
    }

    /// Sets where the work is needed.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the area or department.
    #[must_use]
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Request aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    id: RequestId,
    title: String,
    description: String,
    location: Option<String>,
    area: Option<String>,
    priority: Priority,
    status: RequestStatus,
    created_by: UserId,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRequestData {
    /// Persisted request identifier.
    pub id: RequestId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted location, if any.
    pub location: Option<String>,
    /// Persisted area, if any.
    pub area: Option<String>,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted status.
    pub status: RequestStatus,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Request {
    /// Opens a new request created by `created_by`.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceDomainError::EmptyRequestTitle`] or
    /// [`MaintenanceDomainError::EmptyRequestDescription`] when either
    /// required field is blank.
    pub fn open(
        input: NewRequest,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Result<Self, MaintenanceDomainError> {
        let title = non_blank(input.title).ok_or(MaintenanceDomainError::EmptyRequestTitle)?;
        let description =
            non_blank(input.description).ok_or(MaintenanceDomainError::EmptyRequestDescription)?;

        Ok(Self {
            id: RequestId::new(),
            title,
            description,
            location: input.location.and_then(non_blank),
            area: input.area.and_then(non_blank),
            priority: input.priority,
            status: RequestStatus::Open,
            created_by,
            created_at: clock.utc(),
            completed_at: None,
        })
    }

    /// Reconstructs a request from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRequestData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            location: data.location,
            area: data.area,
            priority: data.priority,
            status: data.status,
            created_by: data.created_by,
            created_at: data.created_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the request identifier.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the location, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the area, if any.
    #[must_use]
    pub fn area(&self) -> Option<&str> {
        self.area.as_deref()
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.status
    }

    /// Returns the administrator who opened the request.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp. Set only while the request is done.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Moves the request to [`RequestStatus::Assigned`] and clears any
    /// completion timestamp.
    pub const fn mark_assigned(&mut self) {
        self.status = RequestStatus::Assigned;
        self.completed_at = None;
    }

    /// Moves the request to [`RequestStatus::Done`], completed at `at`.
    pub const fn complete(&mut self, at: DateTime<Utc>) {
        self.status = RequestStatus::Done;
        self.completed_at = Some(at);
    }

    /// Returns the projection shown next to a technician's task.
    #[must_use]
    pub fn summary(&self) -> RequestSummary {
        RequestSummary {
            id: self.id,
            title: self.title.clone(),
            location: self.location.clone(),
            priority: self.priority,
            status: self.status,
        }
    }
}

/// Trims `value`, returning `None` when nothing is left.
pub(super) fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_owned())
    }
}
