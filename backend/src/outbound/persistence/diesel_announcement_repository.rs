//! PostgreSQL-backed `AnnouncementRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::{Announcement, AnnouncementId};
use crate::domain::ports::{AnnouncementPersistenceError, AnnouncementRepository};

use super::diesel_helpers::{map_diesel_error, map_pool_error, to_i64, to_u64};
use super::models::AnnouncementRow;
use super::pool::DbPool;
use super::schema::announcements;

/// Diesel-backed implementation of the [`AnnouncementRepository`] port.
#[derive(Clone)]
pub struct DieselAnnouncementRepository {
    pool: DbPool,
}

impl DieselAnnouncementRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnouncementRepository for DieselAnnouncementRepository {
    async fn list_visible(
        &self,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Announcement>, AnnouncementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = announcements::table
            .filter(announcements::is_visible.eq(true))
            .order((announcements::created_at.desc(), announcements::id.desc()))
            .offset(to_i64(offset))
            .limit(i64::from(limit))
            .select(AnnouncementRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Announcement::from).collect())
    }

    async fn count_visible(&self) -> Result<u64, AnnouncementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = announcements::table
            .filter(announcements::is_visible.eq(true))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(to_u64(total))
    }

    async fn find_visible(
        &self,
        id: &AnnouncementId,
    ) -> Result<Option<Announcement>, AnnouncementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = announcements::table
            .find(*id.as_uuid())
            .filter(announcements::is_visible.eq(true))
            .select(AnnouncementRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Announcement::from))
    }

    async fn count_view(
        &self,
        id: &AnnouncementId,
    ) -> Result<bool, AnnouncementPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            announcements::table
                .find(*id.as_uuid())
                .filter(announcements::is_visible.eq(true)),
        )
        .set(announcements::views.eq(announcements::views + 1))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
