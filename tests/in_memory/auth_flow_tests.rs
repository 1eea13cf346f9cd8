//! Login and authorization through the assembled service stack.

use crate::test_helpers::{MemoryDesk, PASSWORD};
use chrono::Duration;
use eyre::{Result, ensure};
use fixdesk::error::ErrorKind;
use fixdesk::identity::{
    domain::Role,
    services::{AuthError, UnauthorizedReason},
};
use rstest::{fixture, rstest};

#[fixture]
fn desk() -> MemoryDesk {
    MemoryDesk::in_memory()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issued_token_authorizes_the_same_user(desk: MemoryDesk) -> Result<()> {
    let tech = desk
        .account("Tecnico 1", "tech1@fixdesk.test", Role::Tech)
        .await?;

    let caller = desk.sign_in("TECH1@fixdesk.test").await?;

    ensure!(caller.subject() == tech.id());
    ensure!(caller.role() == Role::Tech);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn wrong_password_and_disabled_account_are_rejected(desk: MemoryDesk) -> Result<()> {
    desk.account("Admin", "admin@fixdesk.test", Role::Admin)
        .await?;
    let tech = desk
        .account("Tecnico", "tech@fixdesk.test", Role::Tech)
        .await?;
    let admin = desk.sign_in("admin@fixdesk.test").await?;

    let wrong = desk.sessions.login("tech@fixdesk.test", "nope").await;
    ensure!(matches!(wrong, Err(AuthError::InvalidCredentials)));

    desk.directory.set_active(&admin, tech.id(), false).await?;
    let disabled = desk.sessions.login("tech@fixdesk.test", PASSWORD).await;
    let err = disabled.err().ok_or_else(|| eyre::eyre!("disabled login succeeded"))?;
    ensure!(matches!(err, AuthError::InvalidCredentials));
    ensure!(err.kind() == ErrorKind::Unauthorized);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn token_stops_working_after_expiry(desk: MemoryDesk) -> Result<()> {
    desk.account("Tecnico", "tech@fixdesk.test", Role::Tech)
        .await?;
    let outcome = desk.sessions.login("tech@fixdesk.test", PASSWORD).await?;

    ensure!(desk.guard.authorize(Some(&outcome.token)).is_ok());
    desk.clock.advance(Duration::hours(8));

    let expired = desk.guard.authorize(Some(&outcome.token));
    ensure!(matches!(
        expired,
        Err(AuthError::Unauthorized(UnauthorizedReason::Expired))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tampered_token_is_rejected(desk: MemoryDesk) -> Result<()> {
    desk.account("Tecnico", "tech@fixdesk.test", Role::Tech)
        .await?;
    let outcome = desk.sessions.login("tech@fixdesk.test", PASSWORD).await?;
    let tampered = format!("{}x", outcome.token);

    let result = desk.guard.authorize(Some(&tampered));

    ensure!(matches!(
        result,
        Err(AuthError::Unauthorized(UnauthorizedReason::InvalidToken))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_sees_techs_but_tech_does_not(desk: MemoryDesk) -> Result<()> {
    desk.account("Admin", "admin@fixdesk.test", Role::Admin)
        .await?;
    let bruno = desk
        .account("Bruno", "bruno@fixdesk.test", Role::Tech)
        .await?;
    let ana = desk.account("Ana", "ana@fixdesk.test", Role::Tech).await?;
    let admin = desk.sign_in("admin@fixdesk.test").await?;
    let tech = desk.sign_in("ana@fixdesk.test").await?;

    let techs = desk.directory.list_active_techs(&admin).await?;
    ensure!(techs == vec![ana.tech_summary(), bruno.tech_summary()]);

    let denied = desk.directory.list_active_techs(&tech).await;
    ensure!(denied.is_err_and(|err| err.kind() == ErrorKind::Forbidden));
    Ok(())
}
