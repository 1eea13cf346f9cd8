//! Port contracts for the maintenance lifecycle engine.

pub mod repository;

pub use repository::{
    MaintenanceRepository, MaintenanceRepositoryError, MaintenanceRepositoryResult,
};
