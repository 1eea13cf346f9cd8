//! Task entity and task status.

use super::{MaintenanceDomainError, ParseStatusError, RequestId, TaskId, request::non_blank};
use crate::identity::domain::UserId;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Returns true for [`TaskStatus::Done`].
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseStatusError::new("task status", value)),
        }
    }
}

/// Input for adding a task to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    request_id: RequestId,
    title: String,
    description: Option<String>,
    assigned_to: Option<UserId>,
    due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    /// Creates input for an unassigned task without a due date.
    #[must_use]
    pub fn new(request_id: RequestId, title: impl Into<String>) -> Self {
        Self {
            request_id,
            title: title.into(),
            description: None,
            assigned_to: None,
            due_date: None,
        }
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Assigns the task to a technician.
    #[must_use]
    pub const fn assigned_to(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Returns the parent request.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the requested assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assigned_to
    }
}

/// A unit of work under a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    request_id: RequestId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    assigned_to: Option<UserId>,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted parent request.
    pub request_id: RequestId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted assignee.
    pub assigned_to: Option<UserId>,
    /// Persisted due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a task in [`TaskStatus::Todo`].
    ///
    /// The assignee is taken as given; eligibility is checked by the caller
    /// against the user directory.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceDomainError::EmptyTaskTitle`] when the title is
    /// blank.
    pub fn new(input: NewTask, clock: &impl Clock) -> Result<Self, MaintenanceDomainError> {
        let title = non_blank(input.title).ok_or(MaintenanceDomainError::EmptyTaskTitle)?;
        Ok(Self {
            id: TaskId::new(),
            request_id: input.request_id,
            title,
            description: input.description.and_then(non_blank),
            status: TaskStatus::Todo,
            assigned_to: input.assigned_to,
            due_date: input.due_date,
            created_at: clock.utc(),
            completed_at: None,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            request_id: data.request_id,
            title: data.title,
            description: data.description,
            status: data.status,
            assigned_to: data.assigned_to,
            due_date: data.due_date,
            created_at: data.created_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the parent request identifier.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp. Set only while the task is done.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns true when `user` is the assignee.
    #[must_use]
    pub fn is_assigned_to(&self, user: UserId) -> bool {
        self.assigned_to == Some(user)
    }

    /// Sets the status, stamping `at` as completion time when done and
    /// clearing it otherwise.
    pub fn set_status(&mut self, status: TaskStatus, at: DateTime<Utc>) {
        self.status = status;
        self.completed_at = status.is_done().then_some(at);
    }
}

/// Parses a due date given as `YYYY-MM-DD` (midnight UTC) or RFC 3339.
///
/// # Errors
///
/// Returns [`MaintenanceDomainError::InvalidDueDate`] when neither format
/// matches.
pub fn parse_due_date(value: &str) -> Result<DateTime<Utc>, MaintenanceDomainError> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| MaintenanceDomainError::InvalidDueDate(value.to_owned()))
}
