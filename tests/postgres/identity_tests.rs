//! User repository behaviour against `PostgreSQL`.

use super::helpers::{pg_desk, unique_email};
use eyre::{Result, ensure};
use fixdesk::error::ErrorKind;
use fixdesk::identity::{domain::Role, ports::UserRepository};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn provisioned_user_can_log_in() -> Result<()> {
    let Some(desk) = pg_desk().await? else {
        return Ok(());
    };
    let email = unique_email("login");
    let user = desk.account("Login Tech", &email, Role::Tech).await?;

    let caller = desk.sign_in(&email.to_uppercase()).await?;

    ensure!(caller.subject() == user.id());
    ensure!(caller.role() == Role::Tech);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_email_is_rejected_case_insensitively() -> Result<()> {
    let Some(desk) = pg_desk().await? else {
        return Ok(());
    };
    let email = unique_email("dup");
    desk.account("First", &email, Role::Tech).await?;

    let second = desk.account("Second", &email.to_uppercase(), Role::Tech).await;

    let err = second.err().ok_or_else(|| eyre::eyre!("duplicate provisioned"))?;
    let directory_error = err
        .downcast_ref::<fixdesk::identity::services::DirectoryError>()
        .ok_or_else(|| eyre::eyre!("unexpected error: {err}"))?;
    ensure!(directory_error.kind() == ErrorKind::InvalidInput);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivated_tech_leaves_the_active_list() -> Result<()> {
    let Some(desk) = pg_desk().await? else {
        return Ok(());
    };
    let admin_email = unique_email("admin");
    desk.account("Admin", &admin_email, Role::Admin).await?;
    let tech = desk
        .account("Leaving Tech", &unique_email("leaving"), Role::Tech)
        .await?;
    let admin = desk.sign_in(&admin_email).await?;

    let before = desk.directory.list_active_techs(&admin).await?;
    ensure!(before.contains(&tech.tech_summary()));

    desk.directory.set_active(&admin, tech.id(), false).await?;

    let after = desk.directory.list_active_techs(&admin).await?;
    ensure!(!after.contains(&tech.tech_summary()));
    let stored = desk
        .users
        .find_by_id(tech.id())
        .await?
        .ok_or_else(|| eyre::eyre!("user vanished"))?;
    ensure!(!stored.is_active());
    Ok(())
}
