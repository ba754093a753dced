//! Votes cast by members on questions and answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ContentRef, UserId, VoteCounters, VoteId};

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteType {
    Approve,
    Reject,
}

impl VoteType {
    /// Stable storage label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl std::str::FromStr for VoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown vote type: {other}")),
        }
    }
}

/// Raised when a vote value is neither a cast nor a retraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("vote value must be 1, 0, or -1, got {0}")]
pub struct InvalidVoteValue(pub i64);

/// Whether a request casts a vote or retracts one.
///
/// `1` casts; `-1` and `0` retract. Everything else is rejected.
///
/// # Examples
/// ```
/// use backend::domain::VoteValue;
///
/// assert_eq!(VoteValue::try_from(1), Ok(VoteValue::Cast));
/// assert_eq!(VoteValue::try_from(0), Ok(VoteValue::Retract));
/// assert!(VoteValue::try_from(2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteValue {
    Cast,
    Retract,
}

impl TryFrom<i64> for VoteValue {
    type Error = InvalidVoteValue;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Cast),
            0 | -1 => Ok(Self::Retract),
            other => Err(InvalidVoteValue(other)),
        }
    }
}

/// A recorded vote. At most one exists per (voter, content) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub id: VoteId,
    pub voter: UserId,
    pub target: ContentRef,
    pub vote_type: VoteType,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    /// Build a new vote.
    pub fn new(
        voter: UserId,
        target: ContentRef,
        vote_type: VoteType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: VoteId::random(),
            voter,
            target,
            vote_type,
            created_at,
        }
    }
}

/// What a vote request changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VoteAction {
    /// A new vote was recorded.
    Cast,
    /// An opposite vote was replaced by the requested one.
    Switched,
    /// A matching vote was removed.
    Retracted,
    /// Nothing matched the retraction; no state changed.
    Unchanged,
}

/// Result returned to the caller of a vote request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub action: VoteAction,
    pub target: ContentRef,
    pub counters: VoteCounters,
    /// Total experience of the content owner after the change.
    pub owner_experience: u32,
}
