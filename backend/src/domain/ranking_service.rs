//! Ranking engine: rank lookups, the leaderboard, and member dashboards.
//!
//! Ranks come from a read-model query in the store rather than a scan in
//! the process. Nothing here writes `previous_rank`; an external snapshot
//! job owns it.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{PageRequest, Paginated};

use crate::domain::ports::{ContentRepository, RankingQuery, UserRepository};
use crate::domain::service_errors::{map_content_error, map_user_error};
use crate::domain::{
    Dashboard, Error, LevelTable, PODIUM_SIZE, RankingEntry, Standing, User, UserId,
};

pub struct RankingService<U, C> {
    users: Arc<U>,
    content: Arc<C>,
    levels: Arc<LevelTable>,
    clock: Arc<dyn Clock>,
}

impl<U, C> RankingService<U, C> {
    pub fn new(
        users: Arc<U>,
        content: Arc<C>,
        levels: Arc<LevelTable>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            content,
            levels,
            clock,
        }
    }
}

fn rank_from_offset(offset: u64, index: usize) -> u32 {
    let position = offset
        .saturating_add(u64::try_from(index).unwrap_or(u64::MAX))
        .saturating_add(1);
    u32::try_from(position).unwrap_or(u32::MAX)
}

impl<U, C> RankingService<U, C>
where
    U: UserRepository,
    C: ContentRepository,
{
    async fn load_user(&self, user: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[async_trait]
impl<U, C> RankingQuery for RankingService<U, C>
where
    U: UserRepository,
    C: ContentRepository,
{
    async fn rank(&self, user: &UserId) -> Result<u32, Error> {
        self.users
            .experience_rank(user)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn rankings(&self, page: PageRequest) -> Result<Paginated<RankingEntry>, Error> {
        let total = self.users.count().await.map_err(map_user_error)?;
        let offset = page.offset();
        let users = self
            .users
            .list_by_experience(offset, page.limit())
            .await
            .map_err(map_user_error)?;

        let now = self.clock.utc();
        let entries = users
            .iter()
            .enumerate()
            .map(|(index, user)| {
                RankingEntry::new(rank_from_offset(offset, index), user, &self.levels, now)
            })
            .collect();
        Ok(Paginated::new(entries, page, total))
    }

    async fn top(&self) -> Result<Vec<RankingEntry>, Error> {
        let users = self
            .users
            .list_by_experience(0, PODIUM_SIZE)
            .await
            .map_err(map_user_error)?;
        let now = self.clock.utc();
        Ok(users
            .iter()
            .enumerate()
            .map(|(index, user)| {
                RankingEntry::new(rank_from_offset(0, index), user, &self.levels, now)
            })
            .collect())
    }

    async fn dashboard(&self, user: &UserId) -> Result<Dashboard, Error> {
        let member = self.load_user(user).await?;
        let rank = self.rank(user).await?;
        // Counted after the rank so a concurrent registration can only grow it.
        let total_users = self.users.count().await.map_err(map_user_error)?;
        let activity = self
            .content
            .author_activity(user)
            .await
            .map_err(map_content_error)?;

        Ok(Dashboard::new(
            &member,
            &self.levels,
            Standing::new(rank, member.previous_rank, total_users),
            activity,
            self.clock.utc(),
        ))
    }
}
