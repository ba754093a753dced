//! Port for the vote ledger's atomic write path.
//!
//! The vote ledger service decides what a request means; the store applies
//! the resulting [`VoteChange`] as one unit. Removing the old vote, recording
//! the new one, moving the content counters, and settling the owner's
//! experience either all happen or none do.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    ContentRef, ExperienceChange, ExperienceEntry, ExperiencePolicy, UserId, Vote, VoteCounters,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by vote store adapters.
    pub enum VoteStoreError for "vote store" {
        /// The voter already holds a vote on the content.
        DuplicateVote => "a vote from this member already exists on the content",
        /// The vote being removed was already gone.
        VoteMissing => "the vote to remove no longer exists",
        /// The voted content was deleted.
        ContentMissing => "the voted content no longer exists",
        /// The member whose experience should move does not exist.
        UserMissing => "the content owner no longer exists",
    }
}

/// Everything one vote request changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteChange {
    pub target: ContentRef,
    /// Owner of `target`; the receipt reports their total.
    pub owner: UserId,
    /// Existing vote to delete; must still be present.
    pub remove: Option<Vote>,
    /// Vote to record; the voter must hold no other vote on `target`.
    pub insert: Option<Vote>,
    /// Experience movements for the owner, applied in order.
    pub experience: Vec<ExperienceChange>,
    pub policy: ExperiencePolicy,
    pub at: DateTime<Utc>,
}

/// State after a [`VoteChange`] committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteReceipt {
    pub counters: VoteCounters,
    /// Ledger rows written, in application order.
    pub entries: Vec<ExperienceEntry>,
    /// Owner's total experience after the change.
    pub owner_total: u32,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// The voter's current vote on `target`, if any.
    async fn find_vote(
        &self,
        voter: &UserId,
        target: ContentRef,
    ) -> Result<Option<Vote>, VoteStoreError>;

    /// Apply a change atomically.
    async fn apply(&self, change: VoteChange) -> Result<VoteReceipt, VoteStoreError>;
}
