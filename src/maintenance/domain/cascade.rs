//! The cascade rule: how task status changes propagate to the parent request.
//!
//! Both repository adapters run the same sequence inside one transaction:
//! load the task, check ownership with [`StatusChange::permits`], update it,
//! count the request's tasks that are still open, and apply the
//! [`CascadeEffect`] to the parent. The result crosses the transaction
//! boundary as a [`StatusChangeOutcome`] value.

use super::{Request, RequestId, RequestStatus, Task, TaskId, TaskStatus};
use crate::identity::domain::Caller;
use chrono::{DateTime, Utc};

/// A requested task status change, with the caller that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// Task to update.
    pub task_id: TaskId,
    /// Target status.
    pub new_status: TaskStatus,
    /// Authenticated caller.
    pub caller: Caller,
    /// Timestamp used for completion stamps.
    pub at: DateTime<Utc>,
}

impl StatusChange {
    /// Returns true when the caller may change `task`.
    ///
    /// Administrators may update any task; technicians only their own.
    #[must_use]
    pub fn permits(&self, task: &Task) -> bool {
        self.caller.is_admin() || task.is_assigned_to(self.caller.subject())
    }

    /// Applies the change to `task` and returns the effect on its parent,
    /// given a way to count the parent's tasks still open after the update.
    ///
    /// # Errors
    ///
    /// Returns [`StatusChangeRejection::NotAssignee`] without touching the
    /// task when the caller may not change it, or whatever `remaining_open`
    /// fails with.
    pub fn apply_to<E>(
        &self,
        task: &mut Task,
        remaining_open: impl FnOnce(&Task) -> Result<usize, E>,
    ) -> Result<CascadeEffect, E>
    where
        E: From<StatusChangeRejection>,
    {
        if !self.permits(task) {
            return Err(StatusChangeRejection::NotAssignee(task.id()).into());
        }
        task.set_status(self.new_status, self.at);
        let open = if self.new_status.is_done() {
            remaining_open(task)?
        } else {
            0
        };
        Ok(CascadeEffect::for_status(self.new_status, open))
    }
}

/// Effect of a task status change on the parent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeEffect {
    /// The last open task was completed: the request is done.
    Complete,
    /// A task was completed while siblings remain open.
    Unchanged,
    /// A task moved away from done: the request is reopened.
    Reopen,
}

impl CascadeEffect {
    /// Derives the effect from the new task status and the number of the
    /// request's tasks still open after the update.
    ///
    /// Any non-done status reopens the request, whatever its siblings and
    /// prior status are.
    #[must_use]
    pub const fn for_status(new_status: TaskStatus, remaining_open: usize) -> Self {
        match (new_status, remaining_open) {
            (TaskStatus::Done, 0) => Self::Complete,
            (TaskStatus::Done, _) => Self::Unchanged,
            (TaskStatus::Todo | TaskStatus::InProgress, _) => Self::Reopen,
        }
    }

    /// Applies the effect to the parent request. Returns true when the
    /// request changed and must be written back.
    pub const fn apply(self, request: &mut Request, at: DateTime<Utc>) -> bool {
        match self {
            Self::Complete => {
                request.complete(at);
                true
            }
            Self::Reopen => {
                request.mark_assigned();
                true
            }
            Self::Unchanged => false,
        }
    }
}

/// Effect of creating a task on the parent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentTransition {
    /// Leave the request as it is.
    Keep,
    /// Move the request to assigned, clearing any completion stamp.
    MarkAssigned,
}

impl ParentTransition {
    /// Tasks created with an assignee mark their request as assigned.
    #[must_use]
    pub const fn for_new_task(task: &Task) -> Self {
        if task.assigned_to().is_some() {
            Self::MarkAssigned
        } else {
            Self::Keep
        }
    }

    /// Applies the transition. Returns true when the request changed.
    pub const fn apply(self, request: &mut Request) -> bool {
        match self {
            Self::MarkAssigned => {
                request.mark_assigned();
                true
            }
            Self::Keep => false,
        }
    }
}

/// Why a status change was not applied. Nothing is written in these cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChangeRejection {
    /// The task does not exist.
    TaskMissing(TaskId),
    /// A technician tried to change a task assigned to someone else.
    NotAssignee(TaskId),
    /// The task's parent request does not exist.
    ParentMissing(RequestId),
}

/// A committed status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChangeApplied {
    /// The task after the update.
    pub task: Task,
    /// Effect applied to the parent request.
    pub effect: CascadeEffect,
    /// Parent request status after the update.
    pub request_status: RequestStatus,
}

/// Tagged result of the atomic status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChangeOutcome {
    /// All steps were committed.
    Applied(StatusChangeApplied),
    /// The transaction was abandoned.
    Rejected(StatusChangeRejection),
}
