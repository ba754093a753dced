//! Announcement reads and view counting.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};
use tracing::debug;

use crate::domain::ports::{
    AnnouncementPersistenceError, AnnouncementQuery, AnnouncementRepository,
};
use crate::domain::{Announcement, AnnouncementId, Error};

pub struct AnnouncementService<A> {
    repository: Arc<A>,
}

impl<A> AnnouncementService<A> {
    pub fn new(repository: Arc<A>) -> Self {
        Self { repository }
    }
}

fn announcement_not_found() -> Error {
    Error::not_found("announcement not found")
}

#[async_trait]
impl<A> AnnouncementQuery for AnnouncementService<A>
where
    A: AnnouncementRepository,
{
    async fn list(&self, page: PageRequest) -> Result<Paginated<Announcement>, Error> {
        let total = self
            .repository
            .count_visible()
            .await
            .map_err(AnnouncementPersistenceError::into_api_error)?;
        let items = self
            .repository
            .list_visible(page.offset(), page.limit())
            .await
            .map_err(AnnouncementPersistenceError::into_api_error)?;
        Ok(Paginated::new(items, page, total))
    }

    async fn detail(&self, id: AnnouncementId) -> Result<Announcement, Error> {
        self.repository
            .find_visible(&id)
            .await
            .map_err(AnnouncementPersistenceError::into_api_error)?
            .ok_or_else(announcement_not_found)
    }

    async fn record_view(&self, id: AnnouncementId) -> Result<(), Error> {
        let counted = self
            .repository
            .count_view(&id)
            .await
            .map_err(AnnouncementPersistenceError::into_api_error)?;
        if !counted {
            return Err(announcement_not_found());
        }
        debug!(announcement_id = %id, "announcement view counted");
        Ok(())
    }
}
