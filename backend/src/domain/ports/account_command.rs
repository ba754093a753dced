//! Driving port for registration, login, and self-service account changes.
//!
//! Inbound adapters call it to create members and authenticate credentials
//! without importing persistence or hashing infrastructure.

use async_trait::async_trait;

use crate::domain::{
    Error, LoginCredentials, PasswordChange, Principal, Profile, ProfileEdit, Registration,
    UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a member and return their new id.
    async fn register(&self, registration: &Registration) -> Result<UserId, Error>;

    /// Validate credentials and return the authenticated member id.
    async fn login(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;

    async fn profile(&self, principal: &Principal) -> Result<Profile, Error>;

    /// Apply a non-empty edit and return the updated profile.
    async fn update_profile(
        &self,
        principal: &Principal,
        edit: ProfileEdit,
    ) -> Result<Profile, Error>;

    /// Replace the password after checking the current one.
    async fn change_password(
        &self,
        principal: &Principal,
        change: &PasswordChange,
    ) -> Result<(), Error>;
}
