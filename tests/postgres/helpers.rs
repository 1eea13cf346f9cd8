//! Shared wiring for `PostgreSQL` integration tests.

use std::sync::Arc;

use crate::test_helpers::Desk;
use eyre::WrapErr;
use fixdesk::config::DatabaseConfig;
use fixdesk::identity::adapters::postgres::PostgresUserRepository;
use fixdesk::maintenance::adapters::postgres::PostgresMaintenanceRepository;
use fixdesk::storage::Store;
use uuid::Uuid;

/// Environment variable naming the test database.
pub const DATABASE_URL_ENV: &str = "FIXDESK_TEST_DATABASE_URL";

/// Desk backed by the `PostgreSQL` adapters.
pub type PgDesk = Desk<PostgresUserRepository, PostgresMaintenanceRepository>;

/// Opens the test database, applies the schema, and wires a desk over it.
///
/// Returns `None` when no test database is configured.
///
/// # Errors
///
/// Returns an error when the database is configured but unreachable.
pub async fn pg_desk() -> eyre::Result<Option<PgDesk>> {
    let Ok(url) = std::env::var(DATABASE_URL_ENV) else {
        return Ok(None);
    };
    let store = Store::open(&DatabaseConfig {
        url,
        max_connections: 4,
    })
    .wrap_err("open test database")?;
    store.apply_schema().await.wrap_err("apply schema")?;
    Ok(Some(Desk::over(
        Arc::new(store.users()),
        Arc::new(store.maintenance()),
    )))
}

/// Returns an email address no other test run uses.
#[must_use]
pub fn unique_email(label: &str) -> String {
    format!("{label}-{}@fixdesk.test", Uuid::new_v4().simple())
}
