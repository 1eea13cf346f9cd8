//! Port contracts for identity management.
//!
//! Ports define infrastructure-agnostic interfaces used by identity services.

pub mod credentials;
pub mod repository;

pub use credentials::{CredentialError, PasswordHasher, TokenCodec};
#[cfg(test)]
pub use credentials::{MockPasswordHasher, MockTokenCodec};
pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
