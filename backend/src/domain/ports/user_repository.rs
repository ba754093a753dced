//! Port abstraction for member persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, PasswordDigest, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError for "user repository" {
        /// Another member already registered the email address.
        DuplicateEmail => "email address is already registered",
        /// Another member already holds the nickname.
        DuplicateNickname => "nickname is already taken",
    }
}

/// Storage for registered members.
///
/// `total_experience` is read here but only ever written through the
/// experience ledger and vote stores.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a newly registered member.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a member by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a member by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Write nickname and email consent. Returns `false` when the member is
    /// gone.
    async fn update_profile(&self, user: &User) -> Result<bool, UserPersistenceError>;

    async fn update_password(
        &self,
        id: &UserId,
        password: &PasswordDigest,
    ) -> Result<bool, UserPersistenceError>;

    /// Number of registered members.
    async fn count(&self) -> Result<u64, UserPersistenceError>;

    /// Members in rank order: experience descending, then registration time,
    /// then id.
    async fn list_by_experience(
        &self,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<User>, UserPersistenceError>;

    /// 1-based position of the member in the same ordering as
    /// [`UserRepository::list_by_experience`], or `None` when unknown.
    async fn experience_rank(&self, id: &UserId) -> Result<Option<u32>, UserPersistenceError>;
}
