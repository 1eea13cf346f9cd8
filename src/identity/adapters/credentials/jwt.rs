//! HS256 JSON Web Token implementation of the [`TokenCodec`] port.

use crate::identity::{
    domain::SessionClaims,
    ports::{CredentialError, TokenCodec},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::fmt;

/// Signs and verifies session tokens with a shared server-side secret.
///
/// Expiry is left to the access guard so it can be checked against an
/// injected clock.
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenCodec {
    /// Creates a codec from the signing secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl fmt::Debug for JwtTokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenCodec for JwtTokenCodec {
    fn encode(&self, claims: &SessionClaims) -> Result<String, CredentialError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|err| CredentialError::Signing(err.to_string()))
    }

    fn decode(&self, token: &str) -> Result<SessionClaims, CredentialError> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| CredentialError::InvalidToken(err.to_string()))
    }
}
