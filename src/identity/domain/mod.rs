//! Domain model for users, credentials, and authenticated callers.
//!
//! Password hashing and token signing live behind ports; the domain only
//! holds their outputs.

mod caller;
mod error;
mod ids;
mod user;

pub use caller::{Caller, SessionClaims};
pub use error::{IdentityDomainError, ParseRoleError};
pub use ids::{DisplayName, EmailAddress, UserId};
pub use user::{PasswordDigest, PersistedUserData, PublicUser, Role, TechSummary, User};
