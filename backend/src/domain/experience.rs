//! Experience rewards, ledger entries, and the settlement arithmetic.
//!
//! Every change to a member's `total_experience` is described by one
//! [`ExperienceEntry`]. Stores call [`settle`] inside the same atomic unit
//! that appends the entry, so the stored total and the ledger cannot
//! diverge. Totals never drop below zero; [`replay`] folds a history with the
//! same floor and reproduces the stored total.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{UserId, VoteType};

/// Reason an experience change happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExperienceCause {
    Question,
    Answer,
    ApproveVote,
}

impl ExperienceCause {
    /// Fixed reward magnitude for the cause.
    pub const fn reward(self) -> u32 {
        match self {
            Self::Question => 10,
            Self::Answer => 15,
            Self::ApproveVote => 20,
        }
    }

    /// Stable storage label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Answer => "answer",
            Self::ApproveVote => "approve_vote",
        }
    }
}

impl std::str::FromStr for ExperienceCause {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "question" => Ok(Self::Question),
            "answer" => Ok(Self::Answer),
            "approve_vote" => Ok(Self::ApproveVote),
            other => Err(format!("unknown experience cause: {other}")),
        }
    }
}

/// Whether experience is granted or taken away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Credit,
    Debit,
}

/// Ledger behaviour that varies between deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperiencePolicy {
    /// Reject votes move experience like approvals do.
    pub reject_votes_award_experience: bool,
    /// Retracting a vote takes back the experience it granted.
    pub retractions_debit_experience: bool,
    /// Debit entries record the clamped amount instead of the nominal one.
    pub debit_ledger_records_applied: bool,
}

impl Default for ExperiencePolicy {
    fn default() -> Self {
        Self {
            reject_votes_award_experience: false,
            retractions_debit_experience: true,
            debit_ledger_records_applied: false,
        }
    }
}

impl ExperiencePolicy {
    /// Whether a vote of `vote_type` moves its content owner's experience.
    pub fn vote_moves_experience(&self, vote_type: VoteType) -> bool {
        match vote_type {
            VoteType::Approve => true,
            VoteType::Reject => self.reject_votes_award_experience,
        }
    }
}

/// A requested change, before the store applies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceChange {
    pub user: UserId,
    pub cause: ExperienceCause,
    pub direction: Direction,
}

impl ExperienceChange {
    /// Grant the reward for `cause` to `user`.
    pub fn credit(user: UserId, cause: ExperienceCause) -> Self {
        Self {
            user,
            cause,
            direction: Direction::Credit,
        }
    }

    /// Take back the reward for `cause` from `user`.
    pub fn debit(user: UserId, cause: ExperienceCause) -> Self {
        Self {
            user,
            cause,
            direction: Direction::Debit,
        }
    }
}

/// Outcome of applying one change to a running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Total after the change.
    pub new_total: u32,
    /// Signed delta actually applied to the total.
    pub applied: i32,
    /// Signed delta written to the ledger entry.
    pub recorded: i32,
}

fn signed(magnitude: u32) -> i32 {
    i32::try_from(magnitude).unwrap_or(i32::MAX)
}

/// Apply `cause` in `direction` to `current_total`.
///
/// Debits floor the total at zero. The recorded amount is the nominal reward
/// unless the policy asks for the applied amount.
///
/// # Examples
/// ```
/// use backend::domain::{settle, Direction, ExperienceCause, ExperiencePolicy};
///
/// let s = settle(5, ExperienceCause::ApproveVote, Direction::Debit, &ExperiencePolicy::default());
/// assert_eq!(s.new_total, 0);
/// assert_eq!(s.applied, -5);
/// assert_eq!(s.recorded, -20);
/// ```
pub fn settle(
    current_total: u32,
    cause: ExperienceCause,
    direction: Direction,
    policy: &ExperiencePolicy,
) -> Settlement {
    let reward = cause.reward();
    match direction {
        Direction::Credit => {
            let new_total = current_total.saturating_add(reward);
            let applied = signed(new_total - current_total);
            Settlement {
                new_total,
                applied,
                recorded: signed(reward),
            }
        }
        Direction::Debit => {
            let new_total = current_total.saturating_sub(reward);
            let applied = -signed(current_total - new_total);
            let recorded = if policy.debit_ledger_records_applied {
                applied
            } else {
                -signed(reward)
            };
            Settlement {
                new_total,
                applied,
                recorded,
            }
        }
    }
}

/// One append-only row of the experience ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    #[schema(value_type = String)]
    pub user: UserId,
    pub change: i32,
    pub cause: ExperienceCause,
    pub recorded_at: DateTime<Utc>,
}

/// Fold a user's history, oldest first, with the same zero floor as
/// [`settle`].
pub fn replay<'a>(entries: impl IntoIterator<Item = &'a ExperienceEntry>) -> u32 {
    entries.into_iter().fold(0_u32, |total, entry| {
        let next = i64::from(total) + i64::from(entry.change);
        u32::try_from(next.max(0)).unwrap_or(u32::MAX)
    })
}

/// Receipt for a credit or debit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceReceipt {
    pub entry: ExperienceEntry,
    pub new_total: u32,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn policy() -> ExperiencePolicy {
        ExperiencePolicy::default()
    }

    fn entry(change: i32) -> ExperienceEntry {
        ExperienceEntry {
            user: UserId::random(),
            change,
            cause: ExperienceCause::ApproveVote,
            recorded_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[rstest]
    #[case(ExperienceCause::Question, 10)]
    #[case(ExperienceCause::Answer, 15)]
    #[case(ExperienceCause::ApproveVote, 20)]
    fn rewards_are_fixed(#[case] cause: ExperienceCause, #[case] reward: u32) {
        assert_eq!(cause.reward(), reward);
    }

    #[rstest]
    fn credit_adds_reward(policy: ExperiencePolicy) {
        let s = settle(15, ExperienceCause::ApproveVote, Direction::Credit, &policy);
        assert_eq!(s, Settlement { new_total: 35, applied: 20, recorded: 20 });
    }

    #[rstest]
    fn debit_clamps_at_zero_and_records_nominal(policy: ExperiencePolicy) {
        let s = settle(5, ExperienceCause::ApproveVote, Direction::Debit, &policy);
        assert_eq!(s, Settlement { new_total: 0, applied: -5, recorded: -20 });
    }

    #[rstest]
    fn debit_can_record_applied_amount() {
        let policy = ExperiencePolicy {
            debit_ledger_records_applied: true,
            ..ExperiencePolicy::default()
        };
        let s = settle(5, ExperienceCause::Question, Direction::Debit, &policy);
        assert_eq!(s, Settlement { new_total: 0, applied: -5, recorded: -5 });
    }

    #[rstest]
    fn credit_saturates_at_maximum(policy: ExperiencePolicy) {
        let s = settle(u32::MAX - 3, ExperienceCause::Answer, Direction::Credit, &policy);
        assert_eq!(s.new_total, u32::MAX);
        assert_eq!(s.applied, 3);
    }

    #[rstest]
    fn replay_floors_every_step() {
        let history = [entry(15), entry(-20), entry(20)];
        assert_eq!(replay(&history), 20);
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn replay_matches_settled_totals(#[case] records_applied: bool) {
        let policy = ExperiencePolicy {
            debit_ledger_records_applied: records_applied,
            ..ExperiencePolicy::default()
        };
        let steps = [
            (ExperienceCause::Answer, Direction::Credit),
            (ExperienceCause::Question, Direction::Debit),
            (ExperienceCause::ApproveVote, Direction::Debit),
            (ExperienceCause::ApproveVote, Direction::Credit),
            (ExperienceCause::Question, Direction::Debit),
        ];
        let mut total = 0;
        let mut history = Vec::new();
        for (cause, direction) in steps {
            let s = settle(total, cause, direction, &policy);
            total = s.new_total;
            history.push(entry(s.recorded));
        }
        assert_eq!(replay(&history), total);
    }

    #[rstest]
    fn reject_votes_move_experience_only_when_enabled(policy: ExperiencePolicy) {
        assert!(policy.vote_moves_experience(VoteType::Approve));
        assert!(!policy.vote_moves_experience(VoteType::Reject));
        let generous = ExperiencePolicy {
            reject_votes_award_experience: true,
            ..policy
        };
        assert!(generous.vote_moves_experience(VoteType::Reject));
    }
}
