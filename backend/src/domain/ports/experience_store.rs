//! Port for the append-only experience ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ExperienceChange, ExperienceEntry, ExperiencePolicy, ExperienceReceipt, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by experience store adapters.
    pub enum ExperienceStoreError for "experience store" {
        /// The member does not exist.
        UserMissing => "the member does not exist",
    }
}

/// Storage for experience history rows and the running total.
///
/// Implementations settle the change with [`crate::domain::settle`] against
/// the locked current total, append exactly one entry, and write the new
/// total in a single atomic unit. Entries are never updated or deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperienceStore: Send + Sync {
    /// Apply one credit or debit.
    async fn append(
        &self,
        change: &ExperienceChange,
        policy: ExperiencePolicy,
        at: DateTime<Utc>,
    ) -> Result<ExperienceReceipt, ExperienceStoreError>;

    /// Every entry for the member, oldest first.
    async fn history(&self, user: &UserId) -> Result<Vec<ExperienceEntry>, ExperienceStoreError>;
}
