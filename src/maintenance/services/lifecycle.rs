//! The lifecycle engine: every request and task operation.
//!
//! Each operation takes the authenticated [`Caller`] explicitly and applies
//! its own role check. Mutations are delegated to the repository as single
//! atomic units.

use super::{MaintenanceServiceError, MaintenanceServiceResult};
use crate::identity::{
    domain::{Caller, UserId},
    ports::UserRepository,
};
use crate::maintenance::{
    domain::{
        AssignedTask, AssignedTaskFilter, AssignedTaskQuery, DueWindow, MaintenanceDomainError,
        NewRequest, NewTask, ParentTransition, Request, RequestDetail, RequestId, StatusChange,
        StatusChangeOutcome, StatusChangeRejection, Task, TaskId, TaskStatus,
    },
    ports::{MaintenanceRepository, MaintenanceRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;

/// Request and task lifecycle service.
pub struct MaintenanceService<M, U, C>
where
    M: MaintenanceRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<M>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<M, U, C> Clone for MaintenanceService<M, U, C>
where
    M: MaintenanceRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            users: Arc::clone(&self.users),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<M, U, C> MaintenanceService<M, U, C>
where
    M: MaintenanceRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<M>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            repository,
            users,
            clock,
        }
    }

    /// Opens a request in status `OPEN`, created by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceServiceError::Forbidden`] unless the caller is an
    /// administrator and [`MaintenanceServiceError::Domain`] when the title
    /// or description is blank.
    pub async fn create_request(
        &self,
        caller: &Caller,
        input: NewRequest,
    ) -> MaintenanceServiceResult<Request> {
        if !caller.is_admin() {
            return Err(MaintenanceServiceError::Forbidden("only admin can create requests"));
        }
        let request = Request::open(input, caller.subject(), &*self.clock)?;
        self.repository.store_request(&request).await?;
        tracing::info!(
            request_id = %request.id(),
            priority = %request.priority(),
            created_by = %caller.subject(),
            "request created"
        );
        Ok(request)
    }

    /// Lists every request with its tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceServiceError::Repository`] when storage fails.
    pub async fn list_requests(
        &self,
        caller: &Caller,
    ) -> MaintenanceServiceResult<Vec<RequestDetail>> {
        let requests = self.repository.list_requests().await?;
        tracing::debug!(caller = %caller.subject(), count = requests.len(), "listed requests");
        Ok(requests)
    }

    /// Returns one request with its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceServiceError::RequestNotFound`] when the request
    /// does not exist.
    pub async fn get_request(
        &self,
        caller: &Caller,
        id: RequestId,
    ) -> MaintenanceServiceResult<RequestDetail> {
        tracing::debug!(caller = %caller.subject(), request_id = %id, "get request");
        self.repository
            .find_request(id)
            .await?
            .ok_or(MaintenanceServiceError::RequestNotFound(id))
    }

    /// Adds a task to a request.
    ///
    /// A task created with an assignee moves its request to `ASSIGNED`,
    /// whatever the request's prior status.
    ///
    /// # Errors
    ///
    /// Checks run in order: the caller must be an administrator
    /// ([`MaintenanceServiceError::Forbidden`]), the title must not be blank
    /// ([`MaintenanceServiceError::Domain`]), the request must exist
    /// ([`MaintenanceServiceError::RequestNotFound`]), and the assignee must
    /// be an active technician ([`MaintenanceServiceError::Domain`]).
    pub async fn create_task(
        &self,
        caller: &Caller,
        input: NewTask,
    ) -> MaintenanceServiceResult<Task> {
        if !caller.is_admin() {
            return Err(MaintenanceServiceError::Forbidden("only admin can create tasks"));
        }
        let task = Task::new(input, &*self.clock)?;
        if self.repository.find_request(task.request_id()).await?.is_none() {
            return Err(MaintenanceServiceError::RequestNotFound(task.request_id()));
        }
        if let Some(assignee) = task.assigned_to() {
            self.ensure_assignable(assignee).await?;
        }

        let request = self
            .repository
            .store_task(&task, ParentTransition::for_new_task(&task))
            .await
            .map_err(|err| match err {
                MaintenanceRepositoryError::RequestNotFound(id) => {
                    MaintenanceServiceError::RequestNotFound(id)
                }
                other => other.into(),
            })?;
        tracing::info!(
            task_id = %task.id(),
            request_id = %request.id(),
            request_status = %request.status(),
            assigned = task.assigned_to().is_some(),
            "task created"
        );
        Ok(task)
    }

    /// Lists the caller's open tasks, soonest due first.
    ///
    /// Non-technicians get an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceServiceError::Repository`] when storage fails.
    pub async fn list_my_pending(
        &self,
        caller: &Caller,
    ) -> MaintenanceServiceResult<Vec<AssignedTask>> {
        self.list_assigned(caller, AssignedTaskFilter::Pending).await
    }

    /// Lists the caller's open tasks due today in local time, plus those
    /// without a due date.
    ///
    /// Non-technicians get an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceServiceError::Repository`] when storage fails.
    pub async fn list_my_today(
        &self,
        caller: &Caller,
    ) -> MaintenanceServiceResult<Vec<AssignedTask>> {
        let window = DueWindow::for_local_day(&self.clock.local());
        self.list_assigned(caller, AssignedTaskFilter::Today(window))
            .await
    }

    /// Lists the caller's most recently completed tasks.
    ///
    /// Non-technicians get an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceServiceError::Repository`] when storage fails.
    pub async fn list_my_done(
        &self,
        caller: &Caller,
    ) -> MaintenanceServiceResult<Vec<AssignedTask>> {
        self.list_assigned(caller, AssignedTaskFilter::Done).await
    }

    /// Changes a task's status and cascades the change to its request in one
    /// atomic unit.
    ///
    /// Completing the last open task completes the request. Moving a task to
    /// any other status reopens the request as `ASSIGNED`.
    ///
    /// # Errors
    ///
    /// Returns [`MaintenanceServiceError::TaskNotFound`] when the task does
    /// not exist and [`MaintenanceServiceError::Forbidden`] when a
    /// technician changes a task assigned to someone else.
    pub async fn update_task_status(
        &self,
        caller: &Caller,
        task_id: TaskId,
        new_status: TaskStatus,
    ) -> MaintenanceServiceResult<Task> {
        let change = StatusChange {
            task_id,
            new_status,
            caller: *caller,
            at: self.clock.utc(),
        };

        match self.repository.apply_status_change(&change).await? {
            StatusChangeOutcome::Applied(applied) => {
                tracing::info!(
                    task_id = %task_id,
                    request_id = %applied.task.request_id(),
                    status = %new_status,
                    request_status = %applied.request_status,
                    effect = ?applied.effect,
                    "task status changed"
                );
                Ok(applied.task)
            }
            StatusChangeOutcome::Rejected(rejection) => {
                tracing::warn!(
                    task_id = %task_id,
                    caller = %caller.subject(),
                    reason = ?rejection,
                    "task status change rejected"
                );
                Err(match rejection {
                    StatusChangeRejection::TaskMissing(id) => {
                        MaintenanceServiceError::TaskNotFound(id)
                    }
                    StatusChangeRejection::NotAssignee(_) => {
                        MaintenanceServiceError::Forbidden("not your task")
                    }
                    StatusChangeRejection::ParentMissing(id) => {
                        MaintenanceServiceError::RequestNotFound(id)
                    }
                })
            }
        }
    }

    async fn ensure_assignable(&self, assignee: UserId) -> MaintenanceServiceResult<()> {
        let eligible = self
            .users
            .find_by_id(assignee)
            .await?
            .is_some_and(|user| user.is_assignable());
        if eligible {
            Ok(())
        } else {
            tracing::warn!(user_id = %assignee, "assignee rejected");
            Err(MaintenanceDomainError::InvalidAssignee(assignee).into())
        }
    }

    async fn list_assigned(
        &self,
        caller: &Caller,
        filter: AssignedTaskFilter,
    ) -> MaintenanceServiceResult<Vec<AssignedTask>> {
        if !caller.is_tech() {
            return Ok(Vec::new());
        }
        let query = AssignedTaskQuery {
            assignee: caller.subject(),
            filter,
        };
        let tasks = self.repository.find_assigned_tasks(&query).await?;
        tracing::debug!(
            caller = %caller.subject(),
            filter = ?filter,
            count = tasks.len(),
            "listed assigned tasks"
        );
        Ok(tasks)
    }
}
