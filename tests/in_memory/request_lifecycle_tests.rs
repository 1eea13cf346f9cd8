//! Request and task lifecycle driven through authenticated callers.

use crate::test_helpers::MemoryDesk;
use chrono::Duration;
use eyre::{Result, ensure, eyre};
use fixdesk::error::ErrorKind;
use fixdesk::identity::domain::{Caller, Role};
use fixdesk::maintenance::{
    domain::{NewRequest, NewTask, Priority, RequestId, RequestStatus, TaskId, TaskStatus},
    services::MaintenanceServiceError,
};
use mockable::Clock;
use rstest::{fixture, rstest};

struct Crew {
    desk: MemoryDesk,
    admin: Caller,
    ana: Caller,
    bruno: Caller,
}

#[fixture]
async fn crew() -> Crew {
    let desk = MemoryDesk::in_memory();
    desk.account("Admin", "admin@fixdesk.test", Role::Admin)
        .await
        .expect("admin provisioned");
    desk.account("Ana", "ana@fixdesk.test", Role::Tech)
        .await
        .expect("ana provisioned");
    desk.account("Bruno", "bruno@fixdesk.test", Role::Tech)
        .await
        .expect("bruno provisioned");
    let admin = desk.sign_in("admin@fixdesk.test").await.expect("admin login");
    let ana = desk.sign_in("ana@fixdesk.test").await.expect("ana login");
    let bruno = desk.sign_in("bruno@fixdesk.test").await.expect("bruno login");
    Crew {
        desk,
        admin,
        ana,
        bruno,
    }
}

impl Crew {
    async fn request(&self, title: &str) -> Result<RequestId> {
        let request = self
            .desk
            .engine
            .create_request(
                &self.admin,
                NewRequest::new(title, "Reported at the front desk")
                    .with_location("Block B")
                    .with_priority(Priority::High),
            )
            .await?;
        Ok(request.id())
    }

    async fn task_for(&self, request: RequestId, title: &str, tech: &Caller) -> Result<TaskId> {
        let task = self
            .desk
            .engine
            .create_task(
                &self.admin,
                NewTask::new(request, title).assigned_to(tech.subject()),
            )
            .await?;
        Ok(task.id())
    }

    async fn status_of(&self, request: RequestId) -> Result<RequestStatus> {
        let detail = self.desk.engine.get_request(&self.admin, request).await?;
        Ok(detail.request.status())
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn two_technicians_close_a_request_together(#[future] crew: Crew) -> Result<()> {
    let crew = crew.await;
    let request = crew.request("Leaking roof").await?;
    ensure!(crew.status_of(request).await? == RequestStatus::Open);

    let first = crew.task_for(request, "Patch tiles", &crew.ana).await?;
    let second = crew.task_for(request, "Replace gutter", &crew.bruno).await?;
    ensure!(crew.status_of(request).await? == RequestStatus::Assigned);

    crew.desk
        .engine
        .update_task_status(&crew.ana, first, TaskStatus::Done)
        .await?;
    ensure!(crew.status_of(request).await? == RequestStatus::Assigned);

    crew.desk.clock.advance(Duration::minutes(30));
    crew.desk
        .engine
        .update_task_status(&crew.bruno, second, TaskStatus::Done)
        .await?;

    let detail = crew.desk.engine.get_request(&crew.admin, request).await?;
    ensure!(detail.request.status() == RequestStatus::Done);
    ensure!(detail.request.completed_at() == Some(crew.desk.clock.utc()));
    ensure!(detail.tasks.iter().all(|task| task.status() == TaskStatus::Done));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopening_a_task_reopens_a_finished_request(#[future] crew: Crew) -> Result<()> {
    let crew = crew.await;
    let request = crew.request("Flickering lights").await?;
    let task = crew.task_for(request, "Swap ballast", &crew.ana).await?;
    crew.desk
        .engine
        .update_task_status(&crew.ana, task, TaskStatus::Done)
        .await?;
    ensure!(crew.status_of(request).await? == RequestStatus::Done);

    let reopened = crew
        .desk
        .engine
        .update_task_status(&crew.ana, task, TaskStatus::InProgress)
        .await?;

    ensure!(reopened.completed_at().is_none());
    let detail = crew.desk.engine.get_request(&crew.admin, request).await?;
    ensure!(detail.request.status() == RequestStatus::Assigned);
    ensure!(detail.request.completed_at().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn technicians_cannot_touch_each_others_tasks(#[future] crew: Crew) -> Result<()> {
    let crew = crew.await;
    let request = crew.request("Broken lock").await?;
    let task = crew.task_for(request, "Replace cylinder", &crew.ana).await?;

    let denied = crew
        .desk
        .engine
        .update_task_status(&crew.bruno, task, TaskStatus::Done)
        .await;

    let err = denied.err().ok_or_else(|| eyre!("foreign update succeeded"))?;
    ensure!(err.kind() == ErrorKind::Forbidden);
    let detail = crew.desk.engine.get_request(&crew.admin, request).await?;
    ensure!(detail.tasks.iter().all(|t| t.status() == TaskStatus::Todo));
    ensure!(detail.request.status() == RequestStatus::Assigned);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn technicians_cannot_create_work(#[future] crew: Crew) -> Result<()> {
    let crew = crew.await;
    let request = crew.request("Noisy fan").await?;

    let new_request = crew
        .desk
        .engine
        .create_request(&crew.ana, NewRequest::new("Mine", "Self-assigned"))
        .await;
    let new_task = crew
        .desk
        .engine
        .create_task(
            &crew.ana,
            NewTask::new(request, "Sneaky").assigned_to(crew.ana.subject()),
        )
        .await;

    ensure!(matches!(new_request, Err(MaintenanceServiceError::Forbidden(_))));
    ensure!(matches!(new_task, Err(MaintenanceServiceError::Forbidden(_))));
    ensure!(crew.status_of(request).await? == RequestStatus::Open);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disabled_technician_keeps_tasks_but_gets_no_new_ones(#[future] crew: Crew) -> Result<()> {
    let crew = crew.await;
    let request = crew.request("Dripping tap").await?;
    let existing = crew.task_for(request, "Replace washer", &crew.bruno).await?;

    crew.desk
        .directory
        .set_active(&crew.admin, crew.bruno.subject(), false)
        .await?;

    let refused = crew.task_for(request, "Check pressure", &crew.bruno).await;
    ensure!(refused.is_err());
    let detail = crew.desk.engine.get_request(&crew.admin, request).await?;
    ensure!(detail.tasks.len() == 1);
    ensure!(detail.tasks.first().map(|task| task.id()) == Some(existing));
    ensure!(detail.tasks.first().and_then(|task| task.assigned_to()) == Some(crew.bruno.subject()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn technician_lists_follow_status(#[future] crew: Crew) -> Result<()> {
    let crew = crew.await;
    let request = crew.request("Office move").await?;
    let tomorrow = crew.desk.clock.utc() + Duration::days(1);
    let later = crew
        .desk
        .engine
        .create_task(
            &crew.admin,
            NewTask::new(request, "Pack desks")
                .assigned_to(crew.ana.subject())
                .due(tomorrow),
        )
        .await?;
    let undated = crew.task_for(request, "Label boxes", &crew.ana).await?;
    crew.task_for(request, "Move servers", &crew.bruno).await?;

    let pending = crew.desk.engine.list_my_pending(&crew.ana).await?;
    let pending_ids: Vec<TaskId> = pending.iter().map(|entry| entry.task.id()).collect();
    ensure!(pending_ids == vec![later.id(), undated]);
    ensure!(pending.iter().all(|entry| entry.request.id == request));
    ensure!(pending.iter().all(|entry| entry.request.priority == Priority::High));

    let today = crew.desk.engine.list_my_today(&crew.ana).await?;
    ensure!(today.iter().map(|entry| entry.task.id()).collect::<Vec<_>>() == vec![undated]);

    crew.desk
        .engine
        .update_task_status(&crew.ana, undated, TaskStatus::Done)
        .await?;
    let done = crew.desk.engine.list_my_done(&crew.ana).await?;
    ensure!(done.len() == 1);
    ensure!(done.first().map(|entry| entry.task.id()) == Some(undated));

    ensure!(crew.desk.engine.list_my_pending(&crew.admin).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_ids_report_not_found(#[future] crew: Crew) -> Result<()> {
    let crew = crew.await;

    let request = crew
        .desk
        .engine
        .get_request(&crew.admin, RequestId::new())
        .await;
    let task = crew
        .desk
        .engine
        .update_task_status(&crew.admin, TaskId::new(), TaskStatus::Done)
        .await;
    let orphan = crew
        .desk
        .engine
        .create_task(&crew.admin, NewTask::new(RequestId::new(), "Orphan"))
        .await;

    ensure!(request.is_err_and(|err| err.kind() == ErrorKind::NotFound));
    ensure!(task.is_err_and(|err| err.kind() == ErrorKind::NotFound));
    ensure!(orphan.is_err_and(|err| err.kind() == ErrorKind::NotFound));
    Ok(())
}
