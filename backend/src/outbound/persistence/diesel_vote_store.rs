//! PostgreSQL-backed `VoteStore`.
//!
//! A change runs in one transaction. The content row is locked first, so
//! concurrent votes on the same question or answer serialise on it; the
//! unique `(voter, target)` constraints catch any duplicate that slips past.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{VoteChange, VoteReceipt, VoteStore, VoteStoreError};
use crate::domain::{ContentRef, UserId, Vote, VoteCounters};

use super::diesel_experience_store::settle_locked;
use super::diesel_helpers::{
    TxError, map_diesel_error, map_pool_error, to_i32, to_u32, unique_violation,
};
use super::models::{NewVoteRow, VoteRow};
use super::pool::DbPool;
use super::schema::{answers, questions, users, votes};

type VoteTx<T> = Result<T, TxError<VoteStoreError>>;

fn abort<T>(error: VoteStoreError) -> VoteTx<T> {
    Err(TxError::Abort(error))
}

/// Diesel-backed implementation of the [`VoteStore`] port.
#[derive(Clone)]
pub struct DieselVoteStore {
    pool: DbPool,
}

impl DieselVoteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn lock_counters(
    conn: &mut AsyncPgConnection,
    target: ContentRef,
) -> VoteTx<Option<VoteCounters>> {
    let counts: Option<(i32, i32)> = match target {
        ContentRef::Question(id) => {
            questions::table
                .find(*id.as_uuid())
                .select((questions::approve_count, questions::reject_count))
                .for_update()
                .first(conn)
                .await
                .optional()?
        }
        ContentRef::Answer(id) => {
            answers::table
                .find(*id.as_uuid())
                .select((answers::approve_count, answers::reject_count))
                .for_update()
                .first(conn)
                .await
                .optional()?
        }
    };
    Ok(counts.map(|(approve, reject)| VoteCounters::new(to_u32(approve), to_u32(reject))))
}

async fn write_counters(
    conn: &mut AsyncPgConnection,
    target: ContentRef,
    counters: VoteCounters,
) -> VoteTx<()> {
    let approve = to_i32(counters.approve_count);
    let reject = to_i32(counters.reject_count);
    match target {
        ContentRef::Question(id) => {
            diesel::update(questions::table.find(*id.as_uuid()))
                .set((
                    questions::approve_count.eq(approve),
                    questions::reject_count.eq(reject),
                ))
                .execute(conn)
                .await?;
        }
        ContentRef::Answer(id) => {
            diesel::update(answers::table.find(*id.as_uuid()))
                .set((
                    answers::approve_count.eq(approve),
                    answers::reject_count.eq(reject),
                ))
                .execute(conn)
                .await?;
        }
    }
    Ok(())
}

async fn apply_locked(conn: &mut AsyncPgConnection, change: VoteChange) -> VoteTx<VoteReceipt> {
    let Some(mut counters) = lock_counters(conn, change.target).await? else {
        return abort(VoteStoreError::content_missing());
    };

    if let Some(old) = &change.remove {
        let removed = diesel::delete(votes::table.find(*old.id.as_uuid()))
            .execute(conn)
            .await?;
        if removed == 0 {
            return abort(VoteStoreError::vote_missing());
        }
        counters.decrement(old.vote_type);
    }

    if let Some(new) = &change.insert {
        match diesel::insert_into(votes::table)
            .values(NewVoteRow::from(new))
            .execute(conn)
            .await
        {
            Ok(_) => counters.increment(new.vote_type),
            Err(error) if unique_violation(&error).is_some() => {
                return abort(VoteStoreError::duplicate_vote());
            }
            Err(error) => return Err(error.into()),
        }
    }
    write_counters(conn, change.target, counters).await?;

    let mut entries = Vec::with_capacity(change.experience.len());
    for movement in &change.experience {
        let Some(receipt) = settle_locked(conn, movement, &change.policy, change.at).await? else {
            return abort(VoteStoreError::user_missing());
        };
        entries.push(receipt.entry);
    }

    let owner_total: Option<i32> = users::table
        .find(*change.owner.as_uuid())
        .select(users::total_experience)
        .first(conn)
        .await
        .optional()?;
    let Some(owner_total) = owner_total else {
        return abort(VoteStoreError::user_missing());
    };

    Ok(VoteReceipt {
        counters,
        entries,
        owner_total: to_u32(owner_total),
    })
}

#[async_trait]
impl VoteStore for DieselVoteStore {
    async fn find_vote(
        &self,
        voter: &UserId,
        target: ContentRef,
    ) -> Result<Option<Vote>, VoteStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = votes::table
            .filter(votes::voter_id.eq(*voter.as_uuid()))
            .select(VoteRow::as_select())
            .into_boxed();
        let query = match target {
            ContentRef::Question(id) => query.filter(votes::question_id.eq(*id.as_uuid())),
            ContentRef::Answer(id) => query.filter(votes::answer_id.eq(*id.as_uuid())),
        };
        let row = query
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| Vote::try_from(row).map_err(VoteStoreError::query))
            .transpose()
    }

    async fn apply(&self, change: VoteChange) -> Result<VoteReceipt, VoteStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, TxError<VoteStoreError>, _>(|conn| {
            async move { apply_locked(conn, change).await }.scope_boxed()
        })
        .await
        .map_err(TxError::into_port_error)
    }
}
