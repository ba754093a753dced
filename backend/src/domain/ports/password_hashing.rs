//! Port for password hashing so services never touch a concrete algorithm.

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashingError {
        /// Hashing failed or the stored digest could not be parsed.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHashing: Send + Sync {
    /// Produce a salted digest for a new password.
    fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashingError>;

    /// Whether `password` matches `digest`.
    fn verify(&self, password: &str, digest: &PasswordDigest)
    -> Result<bool, PasswordHashingError>;
}
