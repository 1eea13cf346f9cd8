//! `PostgreSQL` store handle shared by every repository.
//!
//! The process opens one [`Store`] at start-up, hands repositories built from
//! it to the services, and drops it at shutdown, which closes the pool. No
//! repository reaches for a global connection.

use crate::config::DatabaseConfig;
use crate::identity::adapters::postgres::PostgresUserRepository;
use crate::maintenance::adapters::postgres::PostgresMaintenanceRepository;
use diesel::PgConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;

/// `PostgreSQL` connection pool type.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema applied by [`Store::apply_schema`]. Every statement is idempotent.
pub const SCHEMA_SQL: &str =
    include_str!("../migrations/2026-10-01-000000_create_fixdesk_tables/up.sql");

/// Errors raised while opening or preparing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The pool could not be built or a connection could not be checked out.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),

    /// A schema statement failed.
    #[error("schema error: {0}")]
    Schema(#[from] diesel::result::Error),

    /// The blocking worker running the operation panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Explicitly owned handle to the relational store.
#[derive(Debug, Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Opens a pool against the configured database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Pool`] when the initial connections cannot be
    /// established.
    pub fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let manager = ConnectionManager::<PgConnection>::new(config.url.as_str());
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .build(manager)?;
        tracing::info!(max_connections = config.max_connections, "database pool opened");
        Ok(Self { pool })
    }

    /// Creates missing tables and indexes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when a connection cannot be obtained or a
    /// statement fails.
    pub async fn apply_schema(&self) -> Result<(), StoreError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get()?;
            connection.batch_execute(SCHEMA_SQL)?;
            Ok::<(), StoreError>(())
        })
        .await??;
        tracing::info!("database schema applied");
        Ok(())
    }

    /// Returns a user repository backed by this store.
    #[must_use]
    pub fn users(&self) -> PostgresUserRepository {
        PostgresUserRepository::new(self.pool.clone())
    }

    /// Returns a request and task repository backed by this store.
    #[must_use]
    pub fn maintenance(&self) -> PostgresMaintenanceRepository {
        PostgresMaintenanceRepository::new(self.pool.clone())
    }

    /// Closes the store. Connections are released once every repository
    /// built from it is dropped as well.
    pub fn close(self) {
        tracing::info!(
            idle_connections = self.pool.state().idle_connections,
            "database pool closing"
        );
    }
}
