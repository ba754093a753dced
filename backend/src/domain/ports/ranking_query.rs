//! Driving port for the ranking engine's read path.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{Dashboard, Error, RankingEntry, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RankingQuery: Send + Sync {
    /// 1-based rank of the member.
    async fn rank(&self, user: &UserId) -> Result<u32, Error>;

    /// One page of the leaderboard.
    async fn rankings(&self, page: PageRequest) -> Result<Paginated<RankingEntry>, Error>;

    /// The leading members, at most [`crate::domain::PODIUM_SIZE`] of them.
    async fn top(&self) -> Result<Vec<RankingEntry>, Error>;

    /// Standing, level progress, and activity for the member.
    async fn dashboard(&self, user: &UserId) -> Result<Dashboard, Error>;
}
