//! Application services for the request and task lifecycle.

mod error;
mod lifecycle;

pub use error::{MaintenanceServiceError, MaintenanceServiceResult};
pub use lifecycle::MaintenanceService;
