//! `PostgreSQL` adapters for request and task persistence.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresMaintenanceRepository;
