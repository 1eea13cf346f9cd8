//! In-memory adapters for identity tests and single-process use.

mod user;

pub use user::InMemoryUserRepository;
