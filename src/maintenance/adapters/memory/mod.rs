//! In-memory adapters for maintenance tests and single-process use.

mod repository;

pub use repository::InMemoryMaintenanceRepository;
