//! Access guard: turns a presented session token into a [`Caller`].

use super::{AuthError, AuthResult, UnauthorizedReason};
use crate::identity::{
    domain::{Caller, SessionClaims},
    ports::TokenCodec,
};
use mockable::Clock;
use std::sync::Arc;

/// Extracts the token from an `Authorization: Bearer <token>` header value.
///
/// Returns `None` for any other scheme or an empty token.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.trim().split_once(' ')?;
    let token = rest.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Verifies session tokens on every protected call.
pub struct AccessGuard<T, C>
where
    T: TokenCodec,
    C: Clock + Send + Sync,
{
    codec: Arc<T>,
    clock: Arc<C>,
    leeway_secs: i64,
}

impl<T, C> AccessGuard<T, C>
where
    T: TokenCodec,
    C: Clock + Send + Sync,
{
    /// Creates a guard tolerating `leeway_secs` of clock skew on expiry.
    #[must_use]
    pub const fn new(codec: Arc<T>, clock: Arc<C>, leeway_secs: i64) -> Self {
        Self {
            codec,
            clock,
            leeway_secs,
        }
    }

    /// Verifies signature and expiry and returns the full decoded claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] when the token is missing,
    /// malformed, wrongly signed, or expired.
    pub fn verify(&self, token: Option<&str>) -> AuthResult<SessionClaims> {
        let presented = token
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::Unauthorized(UnauthorizedReason::MissingToken))?;

        let claims = self.codec.decode(presented).map_err(|err| {
            tracing::warn!(error = %err, "token rejected");
            AuthError::Unauthorized(UnauthorizedReason::InvalidToken)
        })?;

        if claims.is_expired_at(self.clock.utc(), self.leeway_secs) {
            tracing::warn!(user_id = %claims.sub, "token rejected: expired");
            return Err(AuthError::Unauthorized(UnauthorizedReason::Expired));
        }
        Ok(claims)
    }

    /// Verifies the token and returns the caller identity for engine calls.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] under the same conditions as
    /// [`Self::verify`].
    pub fn authorize(&self, token: Option<&str>) -> AuthResult<Caller> {
        let claims = self.verify(token)?;
        Ok(Caller::new(claims.sub, claims.role))
    }
}
