//! Fixdesk: maintenance ticketing core.
//!
//! Administrators open maintenance requests, split them into tasks assigned to
//! technicians, and technicians report progress. A request's status is derived
//! from its tasks: it becomes done when the last task is completed and reopens
//! when any task moves away from done.
//!
//! # Architecture
//!
//! Fixdesk follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, hashing, tokens)
//!
//! # Modules
//!
//! - [`identity`]: Users, credentials, session tokens, and the access guard
//! - [`maintenance`]: Requests, tasks, and the lifecycle engine
//! - [`storage`]: Explicit `PostgreSQL` store handle and schema bootstrap
//! - [`config`]: Layered application configuration
//! - [`telemetry`]: Tracing subscriber initialisation
//! - [`error`]: Error taxonomy shared by every service

pub mod config;
pub mod error;
pub mod identity;
pub mod maintenance;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
