//! PostgreSQL-backed `UserRepository`.
//!
//! Rank is answered in SQL by counting the members ordered ahead of the
//! target, so no request loads the whole membership.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, PasswordDigest, User, UserId};

use super::diesel_helpers::{
    map_diesel_error, map_pool_error, to_i64, to_u64, unique_violation,
};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from(row).map_err(UserPersistenceError::query)
}

fn map_write_error(error: diesel::result::Error) -> UserPersistenceError {
    match unique_violation(&error) {
        Some(constraint) if constraint.contains("nickname") => {
            UserPersistenceError::duplicate_nickname()
        }
        Some(_) => UserPersistenceError::duplicate_email(),
        None => map_diesel_error(error),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_user).transpose()
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(to_u64(total))
    }

    async fn list_by_experience(
        &self,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = users::table
            .order((
                users::total_experience.desc(),
                users::created_at.asc(),
                users::id.asc(),
            ))
            .offset(to_i64(offset))
            .limit(i64::from(limit))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_user).collect()
    }

    async fn experience_rank(&self, id: &UserId) -> Result<Option<u32>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let anchor: Option<(i32, DateTime<Utc>)> = users::table
            .find(*id.as_uuid())
            .select((users::total_experience, users::created_at))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some((experience, created_at)) = anchor else {
            return Ok(None);
        };

        let ahead: i64 = users::table
            .filter(
                users::total_experience.gt(experience).or(users::total_experience
                    .eq(experience)
                    .and(
                        users::created_at.lt(created_at).or(users::created_at
                            .eq(created_at)
                            .and(users::id.lt(*id.as_uuid()))),
                    )),
            )
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Some(u32::try_from(ahead.saturating_add(1)).unwrap_or(u32::MAX)))
    }

    async fn update_profile(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(*user.id.as_uuid()))
            .set((
                users::nickname.eq(user.nickname.as_ref()),
                users::email_consent.eq(user.email_consent),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;
        Ok(updated > 0)
    }

    async fn update_password(
        &self,
        id: &UserId,
        password: &PasswordDigest,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(*id.as_uuid()))
            .set(users::password_hash.eq(password.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
