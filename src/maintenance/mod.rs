//! Maintenance requests, their tasks, and the lifecycle engine.
//!
//! A request is opened by an administrator and split into tasks. Task
//! progress reported by technicians rolls up into the request: assigning a
//! task marks the request assigned, completing the last open task completes
//! the request, and moving any task away from done reopens it. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
