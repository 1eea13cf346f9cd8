//! Argon2id implementation of the [`PasswordHasher`] port.

use crate::config::PasswordConfig;
use crate::identity::{
    domain::PasswordDigest,
    ports::{CredentialError, PasswordHasher},
};
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, Version};

/// Argon2id password hasher producing PHC-format digests.
///
/// Verification reads the cost parameters embedded in each digest, so
/// changing the configured cost does not invalidate stored passwords.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with explicit cost parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hashing`] when the parameters fall outside
    /// the ranges Argon2 accepts.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, CredentialError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| CredentialError::Hashing(err.to_string()))?;
        Ok(Self { params })
    }

    /// Creates a hasher from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hashing`] when the configured parameters
    /// are invalid.
    pub fn from_config(config: &PasswordConfig) -> Result<Self, CredentialError> {
        Self::new(config.memory_kib, config.iterations, config.parallelism)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordDigest, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| PasswordDigest::from_encoded(hash.to_string()))
            .map_err(|err| CredentialError::Hashing(err.to_string()))
    }

    fn verify(&self, password: &str, digest: &PasswordDigest) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(digest.as_str())
            .map_err(|err| CredentialError::Hashing(err.to_string()))?;
        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialError::Hashing(err.to_string())),
        }
    }
}
