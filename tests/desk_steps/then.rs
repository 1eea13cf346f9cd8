//! Then steps for the desk BDD scenarios.

use super::world::{DeskWorld, run_async};
use fixdesk::identity::{domain::Role, services::bearer_token};
use fixdesk::maintenance::domain::{AssignedTask, RequestDetail, RequestStatus};
use rstest_bdd_macros::then;

fn current_request(world: &DeskWorld) -> Result<RequestDetail, eyre::Report> {
    let admin = world.admin()?;
    let detail = run_async(world.desk.engine.get_request(&admin, world.request()?))?;
    Ok(detail)
}

fn titles(tasks: &[AssignedTask]) -> String {
    tasks
        .iter()
        .map(|entry| entry.task.title())
        .collect::<Vec<_>>()
        .join(", ")
}

#[then(r#"the request status is "{status}""#)]
fn request_status_is(world: &DeskWorld, status: String) -> Result<(), eyre::Report> {
    let expected = RequestStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let actual = current_request(world)?.request.status();
    eyre::ensure!(actual == expected, "expected request {expected}, found {actual}");
    Ok(())
}

#[then("the request has a completion time")]
fn request_completed(world: &DeskWorld) -> Result<(), eyre::Report> {
    let detail = current_request(world)?;
    eyre::ensure!(detail.request.completed_at().is_some(), "completion time missing");
    Ok(())
}

#[then("the request has no completion time")]
fn request_not_completed(world: &DeskWorld) -> Result<(), eyre::Report> {
    let detail = current_request(world)?;
    eyre::ensure!(detail.request.completed_at().is_none(), "completion time still set");
    Ok(())
}

#[then(r#"the update is refused as "{kind}""#)]
fn update_refused(world: &DeskWorld, kind: String) -> Result<(), eyre::Report> {
    let result = world
        .last_update
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing update result"))?;
    let Err(err) = result else {
        return Err(eyre::eyre!("update unexpectedly succeeded"));
    };
    eyre::ensure!(err.kind().as_str() == kind, "expected {kind}, found {err}");
    Ok(())
}

#[then(r#"today's list for "{email}" is "{expected}""#)]
fn todays_list_is(world: &DeskWorld, email: String, expected: String) -> Result<(), eyre::Report> {
    let caller = world.caller(&email)?;
    let tasks = run_async(world.desk.engine.list_my_today(&caller))?;
    let actual = titles(&tasks);
    eyre::ensure!(actual == expected, "expected [{expected}], found [{actual}]");
    Ok(())
}

#[then(r#"the pending list for "{email}" is "{expected}""#)]
fn pending_list_is(world: &DeskWorld, email: String, expected: String) -> Result<(), eyre::Report> {
    let caller = world.caller(&email)?;
    let tasks = run_async(world.desk.engine.list_my_pending(&caller))?;
    let actual = titles(&tasks);
    eyre::ensure!(actual == expected, "expected [{expected}], found [{actual}]");
    Ok(())
}

#[then(r#"the issued token authorizes "{email}" as "{role}""#)]
fn token_authorizes(world: &DeskWorld, email: String, role: String) -> Result<(), eyre::Report> {
    let outcome = world
        .last_login
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing login result"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("login failed: {err}"))?;
    let expected_role =
        Role::try_from(role.as_str()).map_err(|err| eyre::eyre!("invalid role: {err}"))?;
    let header = format!("Bearer {}", outcome.token);
    let caller = world.desk.guard.authorize(bearer_token(&header))?;
    eyre::ensure!(caller.subject() == world.account(&email)?.id(), "subject mismatch");
    eyre::ensure!(caller.role() == expected_role, "role mismatch");
    Ok(())
}

#[then(r#"the login is rejected as "{kind}""#)]
fn login_rejected(world: &DeskWorld, kind: String) -> Result<(), eyre::Report> {
    let result = world
        .last_login
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing login result"))?;
    let Err(err) = result else {
        return Err(eyre::eyre!("login unexpectedly succeeded"));
    };
    eyre::ensure!(err.kind().as_str() == kind, "expected {kind}, found {err}");
    Ok(())
}
