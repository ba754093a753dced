//! Driving port for casting and retracting votes.

use async_trait::async_trait;

use crate::domain::{ContentRef, Error, Principal, VoteOutcome, VoteType, VoteValue};

/// A validated vote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteRequest {
    pub target: ContentRef,
    pub vote_type: VoteType,
    pub value: VoteValue,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteCommand: Send + Sync {
    /// Cast or retract the principal's vote on the target content.
    async fn cast_vote(
        &self,
        principal: &Principal,
        request: VoteRequest,
    ) -> Result<VoteOutcome, Error>;
}
