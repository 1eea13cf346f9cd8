//! Maintenance repository behaviour against `PostgreSQL`.

use super::helpers::{PgDesk, pg_desk, unique_email};
use chrono::Duration;
use eyre::{Result, ensure, eyre};
use fixdesk::error::ErrorKind;
use fixdesk::identity::domain::{Caller, Role};
use fixdesk::maintenance::domain::{
    NewRequest, NewTask, Priority, RequestId, RequestStatus, TaskId, TaskStatus,
};
use mockable::Clock;
use rstest::rstest;

struct Crew {
    admin: Caller,
    ana: Caller,
    bruno: Caller,
}

async fn crew(desk: &PgDesk) -> Result<Crew> {
    let admin_email = unique_email("admin");
    let ana_email = unique_email("ana");
    let bruno_email = unique_email("bruno");
    desk.account("Admin", &admin_email, Role::Admin).await?;
    desk.account("Ana", &ana_email, Role::Tech).await?;
    desk.account("Bruno", &bruno_email, Role::Tech).await?;
    Ok(Crew {
        admin: desk.sign_in(&admin_email).await?,
        ana: desk.sign_in(&ana_email).await?,
        bruno: desk.sign_in(&bruno_email).await?,
    })
}

async fn request(desk: &PgDesk, admin: &Caller, title: &str) -> Result<RequestId> {
    let created = desk
        .engine
        .create_request(
            admin,
            NewRequest::new(title, "Reported by the night shift")
                .with_location("Plant 2")
                .with_area("HVAC")
                .with_priority(Priority::Critical),
        )
        .await?;
    Ok(created.id())
}

async fn task_for(
    desk: &PgDesk,
    admin: &Caller,
    request: RequestId,
    title: &str,
    tech: &Caller,
) -> Result<TaskId> {
    let created = desk
        .engine
        .create_task(admin, NewTask::new(request, title).assigned_to(tech.subject()))
        .await?;
    Ok(created.id())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn request_round_trips_with_tasks_in_creation_order() -> Result<()> {
    let Some(desk) = pg_desk().await? else {
        return Ok(());
    };
    let crew = crew(&desk).await?;
    let id = request(&desk, &crew.admin, "Chiller alarm").await?;
    let first = task_for(&desk, &crew.admin, id, "Read fault codes", &crew.ana).await?;
    desk.clock.advance(Duration::seconds(1));
    let second = desk
        .engine
        .create_task(
            &crew.admin,
            NewTask::new(id, "Order parts").with_description("Compressor relay"),
        )
        .await?;

    let detail = desk.engine.get_request(&crew.admin, id).await?;

    ensure!(detail.request.title() == "Chiller alarm");
    ensure!(detail.request.location() == Some("Plant 2"));
    ensure!(detail.request.area() == Some("HVAC"));
    ensure!(detail.request.priority() == Priority::Critical);
    ensure!(detail.request.status() == RequestStatus::Assigned);
    ensure!(detail.request.created_by() == crew.admin.subject());
    let ids: Vec<TaskId> = detail.tasks.iter().map(|task| task.id()).collect();
    ensure!(ids == vec![first, second.id()]);
    ensure!(second.assigned_to().is_none());
    ensure!(
        detail
            .tasks
            .last()
            .and_then(|task| task.description().map(str::to_owned))
            == Some("Compressor relay".to_owned())
    );

    let listed = desk.engine.list_requests(&crew.admin).await?;
    ensure!(listed.iter().any(|entry| entry.request.id() == id && entry.tasks.len() == 2));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cascade_completes_and_reopens_the_request() -> Result<()> {
    let Some(desk) = pg_desk().await? else {
        return Ok(());
    };
    let crew = crew(&desk).await?;
    let id = request(&desk, &crew.admin, "Door sensor").await?;
    let first = task_for(&desk, &crew.admin, id, "Align sensor", &crew.ana).await?;
    let second = task_for(&desk, &crew.admin, id, "Test opener", &crew.bruno).await?;

    desk.engine
        .update_task_status(&crew.ana, first, TaskStatus::Done)
        .await?;
    let halfway = desk.engine.get_request(&crew.admin, id).await?;
    ensure!(halfway.request.status() == RequestStatus::Assigned);

    desk.engine
        .update_task_status(&crew.bruno, second, TaskStatus::Done)
        .await?;
    let finished = desk.engine.get_request(&crew.admin, id).await?;
    ensure!(finished.request.status() == RequestStatus::Done);
    ensure!(finished.request.completed_at() == Some(desk.clock.utc()));

    desk.engine
        .update_task_status(&crew.admin, first, TaskStatus::Todo)
        .await?;
    let reopened = desk.engine.get_request(&crew.admin, id).await?;
    ensure!(reopened.request.status() == RequestStatus::Assigned);
    ensure!(reopened.request.completed_at().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_completions_close_the_request() -> Result<()> {
    let Some(desk) = pg_desk().await? else {
        return Ok(());
    };
    let crew = crew(&desk).await?;
    let id = request(&desk, &crew.admin, "Power outage").await?;
    let first = task_for(&desk, &crew.admin, id, "Reset breaker", &crew.ana).await?;
    let second = task_for(&desk, &crew.admin, id, "Check UPS", &crew.bruno).await?;

    let (left, right) = tokio::join!(
        desk.engine
            .update_task_status(&crew.ana, first, TaskStatus::Done),
        desk.engine
            .update_task_status(&crew.bruno, second, TaskStatus::Done),
    );
    left?;
    right?;

    let detail = desk.engine.get_request(&crew.admin, id).await?;
    ensure!(detail.request.status() == RequestStatus::Done);
    ensure!(detail.tasks.iter().all(|task| task.completed_at().is_some()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_update_changes_nothing() -> Result<()> {
    let Some(desk) = pg_desk().await? else {
        return Ok(());
    };
    let crew = crew(&desk).await?;
    let id = request(&desk, &crew.admin, "Loose railing").await?;
    let task = task_for(&desk, &crew.admin, id, "Tighten bolts", &crew.ana).await?;

    let denied = desk
        .engine
        .update_task_status(&crew.bruno, task, TaskStatus::Done)
        .await;

    let err = denied.err().ok_or_else(|| eyre!("foreign update succeeded"))?;
    ensure!(err.kind() == ErrorKind::Forbidden);
    let detail = desk.engine.get_request(&crew.admin, id).await?;
    ensure!(detail.request.status() == RequestStatus::Assigned);
    ensure!(detail.tasks.iter().all(|entry| entry.status() == TaskStatus::Todo));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn technician_lists_are_filtered_in_sql() -> Result<()> {
    let Some(desk) = pg_desk().await? else {
        return Ok(());
    };
    let crew = crew(&desk).await?;
    let id = request(&desk, &crew.admin, "Warehouse audit").await?;
    let now = desk.clock.utc();
    let due_now = desk
        .engine
        .create_task(
            &crew.admin,
            NewTask::new(id, "Count aisle A")
                .assigned_to(crew.ana.subject())
                .due(now),
        )
        .await?;
    let due_later = desk
        .engine
        .create_task(
            &crew.admin,
            NewTask::new(id, "Count aisle B")
                .assigned_to(crew.ana.subject())
                .due(now + Duration::days(2)),
        )
        .await?;
    let undated = task_for(&desk, &crew.admin, id, "Write report", &crew.ana).await?;
    task_for(&desk, &crew.admin, id, "Forklift check", &crew.bruno).await?;

    let pending = desk.engine.list_my_pending(&crew.ana).await?;
    let pending_ids: Vec<TaskId> = pending.iter().map(|entry| entry.task.id()).collect();
    ensure!(pending_ids == vec![due_now.id(), due_later.id(), undated]);
    ensure!(pending.iter().all(|entry| entry.request.title == "Warehouse audit"));

    let today = desk.engine.list_my_today(&crew.ana).await?;
    let today_ids: Vec<TaskId> = today.iter().map(|entry| entry.task.id()).collect();
    ensure!(today_ids == vec![due_now.id(), undated]);

    desk.engine
        .update_task_status(&crew.ana, undated, TaskStatus::Done)
        .await?;
    let done = desk.engine.list_my_done(&crew.ana).await?;
    ensure!(done.iter().map(|entry| entry.task.id()).collect::<Vec<_>>() == vec![undated]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_for_missing_request_is_not_found() -> Result<()> {
    let Some(desk) = pg_desk().await? else {
        return Ok(());
    };
    let crew = crew(&desk).await?;

    let orphan = desk
        .engine
        .create_task(&crew.admin, NewTask::new(RequestId::new(), "Orphan"))
        .await;

    ensure!(orphan.is_err_and(|err| err.kind() == ErrorKind::NotFound));
    Ok(())
}
