//! Read models produced by the ranking engine.
//!
//! Rank is the 1-based position of a member when everyone is ordered by
//! `total_experience` descending, ties broken by registration time and then
//! id. Stores answer the position directly; this module only shapes the
//! numbers for callers.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

use super::{AuthorActivity, Level, LevelTable, User, UserId};

/// Number of members shown on the leaderboard podium.
pub const PODIUM_SIZE: u32 = 3;

/// Total order used for ranks: experience descending, then earlier
/// registration, then id.
pub fn rank_ordering(a: &User, b: &User) -> Ordering {
    b.total_experience
        .cmp(&a.total_experience)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
}

/// Rank delta against the stored snapshot. Positive means the member moved up.
///
/// # Examples
/// ```
/// use backend::domain::rank_change;
///
/// assert_eq!(rank_change(Some(10), 4), 6);
/// assert_eq!(rank_change(Some(2), 5), -3);
/// assert_eq!(rank_change(None, 5), 0);
/// ```
pub fn rank_change(previous_rank: Option<u32>, rank: u32) -> i64 {
    previous_rank.map_or(0, |previous| i64::from(previous) - i64::from(rank))
}

/// Share of the community at or above a rank, floored to hundredths of a
/// percent.
///
/// Stored as an integer count of hundredths so formatting never drifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TopPercentage(u64);

impl TopPercentage {
    /// Compute `floor(rank / total × 100)` to two decimals.
    ///
    /// A total smaller than the rank is treated as equal to it, which can
    /// only happen when the count was read before a concurrent registration.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::TopPercentage;
    ///
    /// assert_eq!(TopPercentage::from_rank(1, 3).to_string(), "33.33");
    /// assert_eq!(TopPercentage::from_rank(2, 3).to_string(), "66.66");
    /// assert_eq!(TopPercentage::from_rank(4, 4).to_string(), "100.00");
    /// ```
    pub fn from_rank(rank: u32, total_users: u64) -> Self {
        let rank = u64::from(rank);
        let total = total_users.max(rank).max(1);
        Self(rank.saturating_mul(10_000) / total)
    }

    /// Raw value in hundredths of a percent.
    pub fn hundredths(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TopPercentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for TopPercentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Where a member stands in the community ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub rank: u32,
    pub previous_rank: Option<u32>,
    pub rank_change: i64,
    /// Formatted with exactly two decimals, e.g. `"12.50"`.
    #[schema(value_type = String, example = "12.50")]
    pub top_percentage: TopPercentage,
    pub total_users: u64,
}

impl Standing {
    /// Derive the standing from a freshly computed rank.
    pub fn new(rank: u32, previous_rank: Option<u32>, total_users: u64) -> Self {
        Self {
            rank,
            previous_rank,
            rank_change: rank_change(previous_rank, rank),
            top_percentage: TopPercentage::from_rank(rank, total_users),
            total_users: total_users.max(u64::from(rank)),
        }
    }
}

/// One row of the community leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub rank: u32,
    #[schema(value_type = String)]
    pub user_id: UserId,
    pub nickname: String,
    pub level: Level,
    pub total_experience: u32,
    pub days_since_joined: i64,
}

impl RankingEntry {
    /// Build a leaderboard row for `user` at `rank`.
    pub fn new(rank: u32, user: &User, levels: &LevelTable, now: DateTime<Utc>) -> Self {
        Self {
            rank,
            user_id: user.id.clone(),
            nickname: user.nickname.to_string(),
            level: levels.level_for(user.total_experience).clone(),
            total_experience: user.total_experience,
            days_since_joined: days_between(user.created_at, now),
        }
    }
}

fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_days().max(0)
}

/// Everything the member dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[schema(value_type = String)]
    pub user_id: UserId,
    pub nickname: String,
    pub total_experience: u32,
    pub level: Level,
    pub next_level: Option<Level>,
    pub experience_to_next_level: Option<u32>,
    pub days_since_joined: i64,
    pub standing: Standing,
    pub activity: AuthorActivity,
}

impl Dashboard {
    /// Assemble the dashboard for `user`.
    pub fn new(
        user: &User,
        levels: &LevelTable,
        standing: Standing,
        activity: AuthorActivity,
        now: DateTime<Utc>,
    ) -> Self {
        let total = user.total_experience;
        Self {
            user_id: user.id.clone(),
            nickname: user.nickname.to_string(),
            total_experience: total,
            level: levels.level_for(total).clone(),
            next_level: levels.next_level(total).cloned(),
            experience_to_next_level: levels.experience_to_next_level(total),
            days_since_joined: days_between(user.created_at, now),
            standing,
            activity,
        }
    }
}
