//! Port for operator announcements.

use async_trait::async_trait;

use crate::domain::{Announcement, AnnouncementId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by announcement repository adapters.
    pub enum AnnouncementPersistenceError for "announcement repository" {}
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    /// Visible announcements, newest first.
    async fn list_visible(
        &self,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Announcement>, AnnouncementPersistenceError>;

    async fn count_visible(&self) -> Result<u64, AnnouncementPersistenceError>;

    /// Hidden announcements read as absent.
    async fn find_visible(
        &self,
        id: &AnnouncementId,
    ) -> Result<Option<Announcement>, AnnouncementPersistenceError>;

    /// Returns `false` when the announcement is missing or hidden.
    async fn count_view(
        &self,
        id: &AnnouncementId,
    ) -> Result<bool, AnnouncementPersistenceError>;
}
