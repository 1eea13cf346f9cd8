//! Read projections and the technician task filters.

use super::{Priority, Request, RequestId, RequestStatus, Task, TaskStatus};
use crate::identity::domain::UserId;
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Maximum number of completed tasks returned by the done history.
pub const DONE_HISTORY_LIMIT: usize = 30;

/// A request with its embedded task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDetail {
    /// The request itself.
    #[serde(flatten)]
    pub request: Request,
    /// Tasks ordered by creation time.
    pub tasks: Vec<Task>,
}

/// Partial request projection shown next to a technician's task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSummary {
    /// Request identifier.
    pub id: RequestId,
    /// Request title.
    pub title: String,
    /// Request location, if any.
    pub location: Option<String>,
    /// Request priority.
    pub priority: Priority,
    /// Request status.
    pub status: RequestStatus,
}

/// A task listed from the assignee's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedTask {
    /// The task itself.
    #[serde(flatten)]
    pub task: Task,
    /// Projection of the parent request.
    pub request: RequestSummary,
}

/// Half-open UTC range `[start, end)` covering one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DueWindow {
    /// Builds the window for the local day containing `now`.
    #[must_use]
    pub fn for_local_day<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let zone = now.timezone();
        let offset_secs = i64::from(now.offset().fix().local_minus_utc());
        let today = now.date_naive();
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        Self {
            start: local_midnight(&zone, today, offset_secs),
            end: local_midnight(&zone, tomorrow, offset_secs),
        }
    }

    /// Builds a window from explicit bounds.
    #[must_use]
    pub const fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Returns the inclusive lower bound.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the exclusive upper bound.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns true when `at` falls inside the window.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

// Midnight can be skipped by a DST jump; fall back to the current offset.
fn local_midnight<Tz: TimeZone>(zone: &Tz, date: NaiveDate, offset_secs: i64) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    zone.from_local_datetime(&naive).earliest().map_or_else(
        || (naive - Duration::seconds(offset_secs)).and_utc(),
        |local| local.with_timezone(&Utc),
    )
}

/// Which of a technician's task lists to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignedTaskFilter {
    /// Open tasks: TODO or IN_PROGRESS.
    Pending,
    /// Open tasks due inside the window, or without a due date.
    Today(DueWindow),
    /// Completed tasks, capped at [`DONE_HISTORY_LIMIT`].
    Done,
}

impl AssignedTaskFilter {
    /// Returns true when `task` belongs in this list.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::Pending => !task.status().is_done(),
            Self::Today(window) => {
                !task.status().is_done() && task.due_date().is_none_or(|due| window.contains(due))
            }
            Self::Done => task.status() == TaskStatus::Done,
        }
    }

    /// Compares two tasks in list order.
    #[must_use]
    pub fn compare(&self, left: &Task, right: &Task) -> Ordering {
        match self {
            Self::Pending | Self::Today(_) => due_nulls_last(left.due_date(), right.due_date())
                .then_with(|| right.created_at().cmp(&left.created_at())),
            Self::Done => right
                .completed_at()
                .cmp(&left.completed_at())
                .then_with(|| right.created_at().cmp(&left.created_at())),
        }
        .then_with(|| left.id().cmp(&right.id()))
    }

    /// Returns the maximum number of results, if capped.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        match self {
            Self::Done => Some(DONE_HISTORY_LIMIT),
            Self::Pending | Self::Today(_) => None,
        }
    }
}

fn due_nulls_last(left: Option<DateTime<Utc>>, right: Option<DateTime<Utc>>) -> Ordering {
    match (left, right) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Query for one technician's task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignedTaskQuery {
    /// The technician whose tasks are listed.
    pub assignee: UserId,
    /// Which list to produce.
    pub filter: AssignedTaskFilter,
}

impl AssignedTaskQuery {
    /// Returns true when `task` is assigned to the technician and passes the
    /// filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        task.is_assigned_to(self.assignee) && self.filter.matches(task)
    }

    /// Sorts and truncates `tasks` into list order.
    pub fn arrange(&self, tasks: &mut Vec<AssignedTask>) {
        tasks.sort_by(|left, right| self.filter.compare(&left.task, &right.task));
        if let Some(limit) = self.filter.limit() {
            tasks.truncate(limit);
        }
    }
}
