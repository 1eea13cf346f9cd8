//! Identity management for Fixdesk.
//!
//! Users carry one of two roles (administrator or technician) and an active
//! flag. This module verifies credentials, issues signed session tokens, and
//! turns a presented token back into a typed [`domain::Caller`] that every
//! maintenance operation receives explicitly. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
