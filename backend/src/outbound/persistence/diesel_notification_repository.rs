//! PostgreSQL-backed `NotificationRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NotificationPersistenceError, NotificationRepository};
use crate::domain::{Notification, NotificationId, UserId};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::NotificationRow;
use super::pool::DbPool;
use super::schema::notifications;

/// Diesel-backed implementation of the [`NotificationRepository`] port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(notifications::table)
            .values(NotificationRow::from(notification))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_for(
        &self,
        recipient: &UserId,
    ) -> Result<Vec<Notification>, NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = notifications::table
            .filter(notifications::recipient_id.eq(*recipient.as_uuid()))
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn mark_read(
        &self,
        recipient: &UserId,
        id: &NotificationId,
    ) -> Result<bool, NotificationPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            notifications::table
                .filter(notifications::id.eq(*id.as_uuid()))
                .filter(notifications::recipient_id.eq(*recipient.as_uuid())),
        )
        .set(notifications::is_read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
