//! `PostgreSQL` repository implementation for requests and tasks.
//!
//! Mutations that touch a request and its tasks lock the request row with
//! `SELECT ... FOR UPDATE` before reading any task. Two status changes on
//! sibling tasks therefore serialize on the parent, and the second one sees
//! the first one's write when it counts the remaining open tasks.

use super::{
    models::{RequestRow, TaskRow},
    schema::{requests, tasks},
};
use crate::identity::domain::UserId;
use crate::maintenance::{
    domain::{
        AssignedTask, AssignedTaskFilter, AssignedTaskQuery, ParentTransition,
        PersistedRequestData, PersistedTaskData, Priority, Request, RequestDetail, RequestId,
        RequestStatus, StatusChange, StatusChangeApplied, StatusChangeOutcome,
        StatusChangeRejection, Task, TaskId, TaskStatus,
    },
    ports::{MaintenanceRepository, MaintenanceRepositoryError, MaintenanceRepositoryResult},
};
use crate::storage::PgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;

/// `PostgreSQL`-backed maintenance repository.
#[derive(Debug, Clone)]
pub struct PostgresMaintenanceRepository {
    pool: PgPool,
}

/// Abort tag carried out of a transaction closure.
#[derive(Debug)]
enum TxError {
    Rejected(StatusChangeRejection),
    Repository(MaintenanceRepositoryError),
}

impl From<DieselError> for TxError {
    fn from(err: DieselError) -> Self {
        Self::Repository(MaintenanceRepositoryError::persistence(err))
    }
}

impl From<StatusChangeRejection> for TxError {
    fn from(rejection: StatusChangeRejection) -> Self {
        Self::Rejected(rejection)
    }
}

impl From<MaintenanceRepositoryError> for TxError {
    fn from(err: MaintenanceRepositoryError) -> Self {
        Self::Repository(err)
    }
}

impl PostgresMaintenanceRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> MaintenanceRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> MaintenanceRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(MaintenanceRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(MaintenanceRepositoryError::persistence)?
    }
}

#[async_trait]
impl MaintenanceRepository for PostgresMaintenanceRepository {
    async fn store_request(&self, request: &Request) -> MaintenanceRepositoryResult<()> {
        let request_id = request.id();
        let row = to_request_row(request);
        self.run_blocking(move |connection| {
            diesel::insert_into(requests::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        MaintenanceRepositoryError::DuplicateRequest(request_id)
                    }
                    other => MaintenanceRepositoryError::persistence(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_request(
        &self,
        id: RequestId,
    ) -> MaintenanceRepositoryResult<Option<RequestDetail>> {
        self.run_blocking(move |connection| {
            let Some(row) = requests::table
                .find(id.into_inner())
                .select(RequestRow::as_select())
                .first::<RequestRow>(connection)
                .optional()
                .map_err(MaintenanceRepositoryError::persistence)?
            else {
                return Ok(None);
            };

            let task_rows = tasks::table
                .filter(tasks::request_id.eq(id.into_inner()))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(MaintenanceRepositoryError::persistence)?;

            Ok(Some(RequestDetail {
                request: row_to_request(row)?,
                tasks: task_rows
                    .into_iter()
                    .map(row_to_task)
                    .collect::<MaintenanceRepositoryResult<_>>()?,
            }))
        })
        .await
    }

    async fn list_requests(&self) -> MaintenanceRepositoryResult<Vec<RequestDetail>> {
        self.run_blocking(|connection| {
            let request_rows = requests::table
                .order((requests::created_at.desc(), requests::id.asc()))
                .select(RequestRow::as_select())
                .load::<RequestRow>(connection)
                .map_err(MaintenanceRepositoryError::persistence)?;
            let ids: Vec<uuid::Uuid> = request_rows.iter().map(|row| row.id).collect();

            let task_rows = tasks::table
                .filter(tasks::request_id.eq_any(ids))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(MaintenanceRepositoryError::persistence)?;

            let mut grouped: HashMap<uuid::Uuid, Vec<Task>> = HashMap::new();
            for row in task_rows {
                let parent = row.request_id;
                grouped.entry(parent).or_default().push(row_to_task(row)?);
            }

            request_rows
                .into_iter()
                .map(|row| {
                    let children = grouped.remove(&row.id).unwrap_or_default();
                    Ok(RequestDetail {
                        request: row_to_request(row)?,
                        tasks: children,
                    })
                })
                .collect()
        })
        .await
    }

    async fn store_task(
        &self,
        task: &Task,
        transition: ParentTransition,
    ) -> MaintenanceRepositoryResult<Request> {
        let task_id = task.id();
        let request_id = task.request_id();
        let row = to_task_row(task);

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TxError, _>(|tx| {
                    let mut request = lock_request(tx, request_id)?
                        .ok_or(MaintenanceRepositoryError::RequestNotFound(request_id))?;

                    diesel::insert_into(tasks::table)
                        .values(&row)
                        .execute(tx)
                        .map_err(|err| match err {
                            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                                TxError::Repository(MaintenanceRepositoryError::DuplicateTask(
                                    task_id,
                                ))
                            }
                            other => TxError::from(other),
                        })?;

                    if transition.apply(&mut request) {
                        write_request_status(tx, &request)?;
                    }
                    Ok(request)
                })
                .map_err(|err| match err {
                    TxError::Repository(inner) => inner,
                    TxError::Rejected(rejection) => MaintenanceRepositoryError::persistence(
                        std::io::Error::other(format!("unexpected rejection: {rejection:?}")),
                    ),
                })
        })
        .await
    }

    async fn find_assigned_tasks(
        &self,
        query: &AssignedTaskQuery,
    ) -> MaintenanceRepositoryResult<Vec<AssignedTask>> {
        let assignee = query.assignee.into_inner();
        let filter = query.filter;

        self.run_blocking(move |connection| {
            let mut statement = tasks::table
                .inner_join(requests::table)
                .filter(tasks::assigned_to.eq(assignee))
                .select((TaskRow::as_select(), RequestRow::as_select()))
                .into_boxed();

            statement = match filter {
                AssignedTaskFilter::Pending => statement
                    .filter(tasks::status.ne(TaskStatus::Done.as_str()))
                    .order((
                        tasks::due_date.asc(),
                        tasks::created_at.desc(),
                        tasks::id.asc(),
                    )),
                AssignedTaskFilter::Today(window) => statement
                    .filter(tasks::status.ne(TaskStatus::Done.as_str()))
                    .filter(
                        tasks::due_date.is_null().or(tasks::due_date
                            .ge(window.start())
                            .and(tasks::due_date.lt(window.end()))),
                    )
                    .order((
                        tasks::due_date.asc(),
                        tasks::created_at.desc(),
                        tasks::id.asc(),
                    )),
                AssignedTaskFilter::Done => statement
                    .filter(tasks::status.eq(TaskStatus::Done.as_str()))
                    .order((
                        tasks::completed_at.desc(),
                        tasks::created_at.desc(),
                        tasks::id.asc(),
                    )),
            };
            if let Some(cap) = filter.limit() {
                let max_rows = i64::try_from(cap).map_err(MaintenanceRepositoryError::persistence)?;
                statement = statement.limit(max_rows);
            }

            let rows = statement
                .load::<(TaskRow, RequestRow)>(connection)
                .map_err(MaintenanceRepositoryError::persistence)?;
            rows.into_iter()
                .map(|(task_row, request_row)| {
                    Ok(AssignedTask {
                        task: row_to_task(task_row)?,
                        request: row_to_request(request_row)?.summary(),
                    })
                })
                .collect()
        })
        .await
    }

    async fn apply_status_change(
        &self,
        change: &StatusChange,
    ) -> MaintenanceRepositoryResult<StatusChangeOutcome> {
        let change = *change;

        self.run_blocking(move |connection| {
            let committed = connection.transaction::<_, TxError, _>(|tx| {
                let parent = tasks::table
                    .find(change.task_id.into_inner())
                    .select(tasks::request_id)
                    .first::<uuid::Uuid>(tx)
                    .optional()?
                    .ok_or(StatusChangeRejection::TaskMissing(change.task_id))?;
                let request_id = RequestId::from_uuid(parent);

                let mut request = lock_request(tx, request_id)?
                    .ok_or(StatusChangeRejection::ParentMissing(request_id))?;

                // Re-read under the parent lock so a concurrent sibling
                // change is fully visible.
                let row = tasks::table
                    .find(change.task_id.into_inner())
                    .select(TaskRow::as_select())
                    .for_update()
                    .first::<TaskRow>(tx)
                    .optional()?
                    .ok_or(StatusChangeRejection::TaskMissing(change.task_id))?;
                let mut task = row_to_task(row)?;

                let effect = change.apply_to(&mut task, |updated| {
                    let open: i64 = tasks::table
                        .filter(tasks::request_id.eq(parent))
                        .filter(tasks::id.ne(updated.id().into_inner()))
                        .filter(tasks::status.ne(TaskStatus::Done.as_str()))
                        .count()
                        .get_result(tx)?;
                    usize::try_from(open)
                        .map_err(|err| TxError::Repository(MaintenanceRepositoryError::persistence(err)))
                })?;

                diesel::update(tasks::table.find(task.id().into_inner()))
                    .set((
                        tasks::status.eq(task.status().as_str()),
                        tasks::completed_at.eq(task.completed_at()),
                    ))
                    .execute(tx)?;

                if effect.apply(&mut request, change.at) {
                    write_request_status(tx, &request)?;
                }

                Ok(StatusChangeApplied {
                    task,
                    effect,
                    request_status: request.status(),
                })
            });

            match committed {
                Ok(applied) => Ok(StatusChangeOutcome::Applied(applied)),
                Err(TxError::Rejected(rejection)) => Ok(StatusChangeOutcome::Rejected(rejection)),
                Err(TxError::Repository(err)) => Err(err),
            }
        })
        .await
    }
}

fn lock_request(
    connection: &mut PgConnection,
    id: RequestId,
) -> Result<Option<Request>, TxError> {
    let row = requests::table
        .find(id.into_inner())
        .select(RequestRow::as_select())
        .for_update()
        .first::<RequestRow>(connection)
        .optional()?;
    row.map(row_to_request).transpose().map_err(TxError::from)
}

fn write_request_status(connection: &mut PgConnection, request: &Request) -> Result<(), TxError> {
    diesel::update(requests::table.find(request.id().into_inner()))
        .set((
            requests::status.eq(request.status().as_str()),
            requests::completed_at.eq(request.completed_at()),
        ))
        .execute(connection)?;
    Ok(())
}

fn to_request_row(request: &Request) -> RequestRow {
    RequestRow {
        id: request.id().into_inner(),
        title: request.title().to_owned(),
        description: request.description().to_owned(),
        location: request.location().map(str::to_owned),
        area: request.area().map(str::to_owned),
        priority: request.priority().as_str().to_owned(),
        status: request.status().as_str().to_owned(),
        created_by: request.created_by().into_inner(),
        created_at: request.created_at(),
        completed_at: request.completed_at(),
    }
}

fn to_task_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().into_inner(),
        request_id: task.request_id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        assigned_to: task.assigned_to().map(UserId::into_inner),
        due_date: task.due_date(),
        created_at: task.created_at(),
        completed_at: task.completed_at(),
    }
}

fn row_to_request(row: RequestRow) -> MaintenanceRepositoryResult<Request> {
    let data = PersistedRequestData {
        id: RequestId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        location: row.location,
        area: row.area,
        priority: Priority::try_from(row.priority.as_str())
            .map_err(MaintenanceRepositoryError::persistence)?,
        status: RequestStatus::try_from(row.status.as_str())
            .map_err(MaintenanceRepositoryError::persistence)?,
        created_by: UserId::from_uuid(row.created_by),
        created_at: row.created_at,
        completed_at: row.completed_at,
    };
    Ok(Request::from_persisted(data))
}

fn row_to_task(row: TaskRow) -> MaintenanceRepositoryResult<Task> {
    let data = PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        request_id: RequestId::from_uuid(row.request_id),
        title: row.title,
        description: row.description,
        status: TaskStatus::try_from(row.status.as_str())
            .map_err(MaintenanceRepositoryError::persistence)?,
        assigned_to: row.assigned_to.map(UserId::from_uuid),
        due_date: row.due_date,
        created_at: row.created_at,
        completed_at: row.completed_at,
    };
    Ok(Task::from_persisted(data))
}
