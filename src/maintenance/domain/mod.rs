//! Domain model for maintenance requests and tasks.
//!
//! Holds the status enums, both aggregates, the cascade rule that derives a
//! request's status from its tasks, and the read projections handed to
//! callers. Persistence stays outside this boundary.

mod cascade;
mod error;
mod ids;
mod request;
mod task;
mod views;

pub use cascade::{
    CascadeEffect, ParentTransition, StatusChange, StatusChangeApplied, StatusChangeOutcome,
    StatusChangeRejection,
};
pub use error::{MaintenanceDomainError, ParseStatusError};
pub use ids::{RequestId, TaskId};
pub use request::{NewRequest, PersistedRequestData, Priority, Request, RequestStatus};
pub use task::{NewTask, PersistedTaskData, Task, TaskStatus, parse_due_date};
pub use views::{
    AssignedTask, AssignedTaskFilter, AssignedTaskQuery, DONE_HISTORY_LIMIT, DueWindow,
    RequestDetail, RequestSummary,
};
