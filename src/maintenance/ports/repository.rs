//! Repository port for requests and tasks.
//!
//! Every mutating method is one atomic unit: implementations either commit
//! all of its writes or none.

use crate::maintenance::domain::{
    AssignedTask, AssignedTaskQuery, ParentTransition, Request, RequestDetail, RequestId,
    StatusChange, StatusChangeOutcome, Task, TaskId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for maintenance repository operations.
pub type MaintenanceRepositoryResult<T> = Result<T, MaintenanceRepositoryError>;

/// Request and task persistence contract.
#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    /// Stores a new request.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceRepositoryError::DuplicateRequest`] when the
    /// identifier already exists.
    async fn store_request(&self, request: &Request) -> MaintenanceRepositoryResult<()>;

    /// Finds a request with its tasks ordered by creation time.
    ///
    /// Returns `None` when the request does not exist.
    async fn find_request(&self, id: RequestId) -> MaintenanceRepositoryResult<Option<RequestDetail>>;

    /// Returns every request with its tasks, newest request first.
    async fn list_requests(&self) -> MaintenanceRepositoryResult<Vec<RequestDetail>>;

    /// Inserts a task and applies `transition` to its parent request in the
    /// same unit. Returns the parent as written.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceRepositoryError::RequestNotFound`] when the parent
    /// does not exist and [`MaintenanceRepositoryError::DuplicateTask`] when
    /// the task identifier is taken. Nothing is written in either case.
    async fn store_task(
        &self,
        task: &Task,
        transition: ParentTransition,
    ) -> MaintenanceRepositoryResult<Request>;

    /// Returns the tasks matching `query`, each joined with its request
    /// summary, in list order.
    async fn find_assigned_tasks(
        &self,
        query: &AssignedTaskQuery,
    ) -> MaintenanceRepositoryResult<Vec<AssignedTask>>;

    /// Runs the cascading status update as one transaction.
    ///
    /// Rejections come back as [`StatusChangeOutcome::Rejected`] after the
    /// transaction is rolled back; only infrastructure failures are errors.
    async fn apply_status_change(
        &self,
        change: &StatusChange,
    ) -> MaintenanceRepositoryResult<StatusChangeOutcome>;
}

/// Errors returned by maintenance repository implementations.
#[derive(Debug, Clone, Error)]
pub enum MaintenanceRepositoryError {
    /// A request with the same identifier already exists.
    #[error("duplicate request identifier: {0}")]
    DuplicateRequest(RequestId),

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The referenced request does not exist.
    #[error("request not found: {0}")]
    RequestNotFound(RequestId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MaintenanceRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
