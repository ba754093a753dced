//! Argon2id password hashing adapter.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::PasswordDigest;
use crate::domain::ports::{PasswordHashing, PasswordHashingError};

/// Hashes passwords with Argon2id and stores them in PHC string format.
///
/// Verification reads the parameters from the stored digest, so raising the
/// cost only affects new registrations.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHashing {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHashing {
    /// Hash with explicit cost parameters.
    pub fn new(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHashing {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl PasswordHashing for Argon2PasswordHashing {
    fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashingError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHashingError::hashing(err.to_string()))?;
        Ok(PasswordDigest::new(hash.to_string()))
    }

    fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashingError> {
        let parsed = PasswordHash::new(digest.as_str())
            .map_err(|err| PasswordHashingError::hashing(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashingError::hashing(err.to_string())),
        }
    }
}
