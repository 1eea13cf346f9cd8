//! Diesel row models for request and task persistence.

use super::schema::{requests, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row for request records, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RequestRow {
    /// Request identifier.
    pub id: uuid::Uuid,
    /// Short title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Where the work is needed.
    pub location: Option<String>,
    /// Area or department.
    pub area: Option<String>,
    /// Priority name.
    pub priority: String,
    /// Status name.
    pub status: String,
    /// Creator.
    pub created_by: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Row for task records, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Parent request.
    pub request_id: uuid::Uuid,
    /// Short title.
    pub title: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Status name.
    pub status: String,
    /// Assigned technician.
    pub assigned_to: Option<uuid::Uuid>,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}
