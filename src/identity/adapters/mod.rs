//! Adapter implementations for identity ports.

pub mod credentials;
pub mod memory;
pub mod postgres;
