//! Adapter implementations for maintenance ports.

pub mod memory;
pub mod postgres;
