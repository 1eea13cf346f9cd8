//! Application services for sessions, access control, and the user
//! directory.

mod directory;
mod error;
mod guard;
mod session;

pub use directory::{DirectoryError, DirectoryResult, ProvisionUserRequest, UserDirectoryService};
pub use error::{AuthError, AuthResult, UnauthorizedReason};
pub use guard::{AccessGuard, bearer_token};
pub use session::{LoginOutcome, SessionService};
