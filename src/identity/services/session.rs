//! Login: credential verification and session token issuance.

use super::{AuthError, AuthResult};
use crate::identity::{
    domain::{EmailAddress, PasswordDigest, PublicUser, SessionClaims, User},
    ports::{CredentialError, PasswordHasher, TokenCodec, UserRepository},
};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

/// Plaintext verified against a throwaway digest when the account is unknown
/// or inactive, so every rejected login costs one hash verification.
const DUMMY_PASSWORD: &str = "fixdesk-dummy-password";

/// Successful login result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
    /// Signed session token. Discarding it is the only way to log out.
    pub token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// Public projection of the authenticated user.
    pub user: PublicUser,
}

/// Session issuing service.
pub struct SessionService<R, H, T, C>
where
    R: UserRepository,
    H: PasswordHasher,
    T: TokenCodec,
    C: Clock + Send + Sync,
{
    users: Arc<R>,
    hasher: Arc<H>,
    codec: Arc<T>,
    clock: Arc<C>,
    ttl: Duration,
    dummy_digest: OnceLock<PasswordDigest>,
}

impl<R, H, T, C> SessionService<R, H, T, C>
where
    R: UserRepository,
    H: PasswordHasher,
    T: TokenCodec,
    C: Clock + Send + Sync,
{
    /// Creates a session service issuing tokens valid for `ttl`.
    #[must_use]
    pub const fn new(
        users: Arc<R>,
        hasher: Arc<H>,
        codec: Arc<T>,
        clock: Arc<C>,
        ttl: Duration,
    ) -> Self {
        Self {
            users,
            hasher,
            codec,
            clock,
            ttl,
            dummy_digest: OnceLock::new(),
        }
    }

    /// Verifies credentials and issues a signed session token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredentials`] when either field is empty,
    /// [`AuthError::InvalidCredentials`] when the account does not exist, is
    /// inactive, or the password does not match, and an infrastructure
    /// variant when lookup, hashing, or signing fails.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<LoginOutcome> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let account = match EmailAddress::new(email) {
            Ok(address) => self.users.find_by_email(&address).await?,
            Err(_) => None,
        };
        let Some(user) = account.filter(User::is_active) else {
            self.hasher.verify(password, self.dummy_digest()?)?;
            tracing::warn!("login rejected: unknown or inactive account");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, user.password())? {
            tracing::warn!(user_id = %user.id(), "login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let issued_at = self.clock.utc();
        let claims = SessionClaims::for_user(&user, issued_at, self.ttl);
        let token = self.codec.encode(&claims)?;
        tracing::info!(user_id = %user.id(), role = %user.role(), "session issued");

        Ok(LoginOutcome {
            token,
            expires_at: issued_at + self.ttl,
            user: user.public(),
        })
    }

    fn dummy_digest(&self) -> Result<&PasswordDigest, CredentialError> {
        if let Some(digest) = self.dummy_digest.get() {
            return Ok(digest);
        }
        let digest = self.hasher.hash(DUMMY_PASSWORD)?;
        Ok(self.dummy_digest.get_or_init(|| digest))
    }
}
