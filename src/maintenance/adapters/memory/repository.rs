//! In-memory repository for requests and tasks.
//!
//! Each mutation holds the write lock for its whole read-modify-write
//! sequence, which makes it one transaction. Work happens on clones so a
//! rejected change leaves the state untouched.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::maintenance::{
    domain::{
        AssignedTask, AssignedTaskQuery, ParentTransition, Request, RequestDetail, RequestId,
        StatusChange, StatusChangeApplied, StatusChangeOutcome, StatusChangeRejection, Task,
        TaskId,
    },
    ports::{MaintenanceRepository, MaintenanceRepositoryError, MaintenanceRepositoryResult},
};

/// Thread-safe in-memory maintenance repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMaintenanceRepository {
    state: Arc<RwLock<InMemoryMaintenanceState>>,
}

#[derive(Debug, Default)]
struct InMemoryMaintenanceState {
    requests: HashMap<RequestId, Request>,
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryMaintenanceState {
    fn tasks_of(&self, request_id: RequestId) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|task| task.request_id() == request_id)
            .cloned()
            .collect();
        tasks.sort_by(|left, right| {
            left.created_at()
                .cmp(&right.created_at())
                .then_with(|| left.id().cmp(&right.id()))
        });
        tasks
    }

    fn detail(&self, request: &Request) -> RequestDetail {
        RequestDetail {
            request: request.clone(),
            tasks: self.tasks_of(request.id()),
        }
    }

    fn open_siblings(&self, task: &Task) -> usize {
        self.tasks
            .values()
            .filter(|other| {
                other.request_id() == task.request_id()
                    && other.id() != task.id()
                    && !other.status().is_done()
            })
            .count()
    }
}

impl InMemoryMaintenanceRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> MaintenanceRepositoryError {
    MaintenanceRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl MaintenanceRepository for InMemoryMaintenanceRepository {
    async fn store_request(&self, request: &Request) -> MaintenanceRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.requests.contains_key(&request.id()) {
            return Err(MaintenanceRepositoryError::DuplicateRequest(request.id()));
        }
        state.requests.insert(request.id(), request.clone());
        Ok(())
    }

    async fn find_request(
        &self,
        id: RequestId,
    ) -> MaintenanceRepositoryResult<Option<RequestDetail>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.requests.get(&id).map(|request| state.detail(request)))
    }

    async fn list_requests(&self) -> MaintenanceRepositoryResult<Vec<RequestDetail>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut requests: Vec<&Request> = state.requests.values().collect();
        requests.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(requests
            .into_iter()
            .map(|request| state.detail(request))
            .collect())
    }

    async fn store_task(
        &self,
        task: &Task,
        transition: ParentTransition,
    ) -> MaintenanceRepositoryResult<Request> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(MaintenanceRepositoryError::DuplicateTask(task.id()));
        }
        let mut request = state
            .requests
            .get(&task.request_id())
            .cloned()
            .ok_or(MaintenanceRepositoryError::RequestNotFound(task.request_id()))?;

        if transition.apply(&mut request) {
            state.requests.insert(request.id(), request.clone());
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(request)
    }

    async fn find_assigned_tasks(
        &self,
        query: &AssignedTaskQuery,
    ) -> MaintenanceRepositoryResult<Vec<AssignedTask>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut tasks: Vec<AssignedTask> = state
            .tasks
            .values()
            .filter(|task| query.matches(task))
            .filter_map(|task| {
                state.requests.get(&task.request_id()).map(|request| AssignedTask {
                    task: task.clone(),
                    request: request.summary(),
                })
            })
            .collect();
        query.arrange(&mut tasks);
        Ok(tasks)
    }

    async fn apply_status_change(
        &self,
        change: &StatusChange,
    ) -> MaintenanceRepositoryResult<StatusChangeOutcome> {
        let mut state = self.state.write().map_err(poisoned)?;
        let Some(mut task) = state.tasks.get(&change.task_id).cloned() else {
            return Ok(StatusChangeOutcome::Rejected(
                StatusChangeRejection::TaskMissing(change.task_id),
            ));
        };
        let Some(mut request) = state.requests.get(&task.request_id()).cloned() else {
            return Ok(StatusChangeOutcome::Rejected(
                StatusChangeRejection::ParentMissing(task.request_id()),
            ));
        };

        let effect = match change.apply_to(&mut task, |updated| {
            Ok::<_, StatusChangeRejection>(state.open_siblings(updated))
        }) {
            Ok(effect) => effect,
            Err(rejection) => return Ok(StatusChangeOutcome::Rejected(rejection)),
        };

        if effect.apply(&mut request, change.at) {
            state.requests.insert(request.id(), request.clone());
        }
        state.tasks.insert(task.id(), task.clone());

        Ok(StatusChangeOutcome::Applied(StatusChangeApplied {
            task,
            effect,
            request_status: request.status(),
        }))
    }
}
