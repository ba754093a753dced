//! Driving port for reading a member's experience history.

use async_trait::async_trait;

use crate::domain::{Error, ExperienceEntry, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperienceQuery: Send + Sync {
    /// Ledger entries for the member, oldest first.
    async fn history(&self, user: &UserId) -> Result<Vec<ExperienceEntry>, Error>;
}
