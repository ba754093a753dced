//! Driving port for reading announcements.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{Announcement, AnnouncementId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnnouncementQuery: Send + Sync {
    /// One page of visible announcements, newest first.
    async fn list(&self, page: PageRequest) -> Result<Paginated<Announcement>, Error>;

    /// A single visible announcement.
    async fn detail(&self, id: AnnouncementId) -> Result<Announcement, Error>;

    /// Count one view of a visible announcement.
    async fn record_view(&self, id: AnnouncementId) -> Result<(), Error>;
}
