//! PostgreSQL-backed `ExperienceStore`.
//!
//! Each change locks the member row, settles against the locked total,
//! appends one ledger row, and writes the new total in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ExperienceStore, ExperienceStoreError};
use crate::domain::{
    ExperienceChange, ExperienceEntry, ExperiencePolicy, ExperienceReceipt, UserId, settle,
};

use super::diesel_helpers::{TxError, map_diesel_error, map_pool_error, to_i32, to_u32};
use super::models::{ExperienceEntryRow, NewExperienceEntryRow};
use super::pool::DbPool;
use super::schema::{experience_entries, users};

/// Settle `change` inside the caller's transaction.
///
/// Returns `None` when the member does not exist.
pub(super) async fn settle_locked(
    conn: &mut AsyncPgConnection,
    change: &ExperienceChange,
    policy: &ExperiencePolicy,
    at: DateTime<Utc>,
) -> Result<Option<ExperienceReceipt>, diesel::result::Error> {
    let current: Option<i32> = users::table
        .find(*change.user.as_uuid())
        .select(users::total_experience)
        .for_update()
        .first(conn)
        .await
        .optional()?;
    let Some(current) = current else {
        return Ok(None);
    };

    let settlement = settle(to_u32(current), change.cause, change.direction, policy);
    let entry = ExperienceEntry {
        user: change.user.clone(),
        change: settlement.recorded,
        cause: change.cause,
        recorded_at: at,
    };
    diesel::insert_into(experience_entries::table)
        .values(NewExperienceEntryRow::from(&entry))
        .execute(conn)
        .await?;
    diesel::update(users::table.find(*change.user.as_uuid()))
        .set(users::total_experience.eq(to_i32(settlement.new_total)))
        .execute(conn)
        .await?;

    Ok(Some(ExperienceReceipt {
        entry,
        new_total: settlement.new_total,
    }))
}

/// Diesel-backed implementation of the [`ExperienceStore`] port.
#[derive(Clone)]
pub struct DieselExperienceStore {
    pool: DbPool,
}

impl DieselExperienceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExperienceStore for DieselExperienceStore {
    async fn append(
        &self,
        change: &ExperienceChange,
        policy: ExperiencePolicy,
        at: DateTime<Utc>,
    ) -> Result<ExperienceReceipt, ExperienceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, TxError<ExperienceStoreError>, _>(|conn| {
            async move {
                settle_locked(conn, change, &policy, at)
                    .await?
                    .ok_or_else(|| TxError::Abort(ExperienceStoreError::user_missing()))
            }
            .scope_boxed()
        })
        .await
        .map_err(TxError::into_port_error)
    }

    async fn history(&self, user: &UserId) -> Result<Vec<ExperienceEntry>, ExperienceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let known: i64 = users::table
            .find(*user.as_uuid())
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if known == 0 {
            return Err(ExperienceStoreError::user_missing());
        }

        let rows = experience_entries::table
            .filter(experience_entries::user_id.eq(*user.as_uuid()))
            .order(experience_entries::id.asc())
            .select(ExperienceEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| ExperienceEntry::try_from(row).map_err(ExperienceStoreError::query))
            .collect()
    }
}
