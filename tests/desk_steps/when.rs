//! When steps for the desk BDD scenarios.

use super::world::{DeskWorld, run_async};
use crate::test_helpers::PASSWORD;
use fixdesk::maintenance::domain::TaskStatus;
use rstest_bdd_macros::when;

#[when(r#""{email}" marks task "{title}" as "{status}""#)]
fn marks_task(
    world: &mut DeskWorld,
    email: String,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let caller = world.caller(&email)?;
    let task = world.task(&title)?;
    let new_status = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    world.desk.clock.advance(chrono::Duration::minutes(5));
    let result = run_async(world.desk.engine.update_task_status(&caller, task, new_status));
    world.last_update = Some(result);
    Ok(())
}

#[when(r#""{email}" logs in with the correct password"#)]
fn logs_in_correctly(world: &mut DeskWorld, email: String) {
    let result = run_async(world.desk.sessions.login(&email, PASSWORD));
    world.last_login = Some(result);
}

#[when(r#""{email}" logs in with password "{password}""#)]
fn logs_in_with(world: &mut DeskWorld, email: String, password: String) {
    let result = run_async(world.desk.sessions.login(&email, &password));
    world.last_login = Some(result);
}

#[when(r#""{email}" logs in without a password"#)]
fn logs_in_without_password(world: &mut DeskWorld, email: String) {
    let result = run_async(world.desk.sessions.login(&email, ""));
    world.last_login = Some(result);
}
