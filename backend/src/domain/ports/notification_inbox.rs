//! Driving port for a member's notification inbox.

use async_trait::async_trait;

use crate::domain::{Error, Notification, NotificationId, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationInbox: Send + Sync {
    /// The principal's notifications, newest first.
    async fn list(&self, principal: &Principal) -> Result<Vec<Notification>, Error>;

    /// Mark one notification read. Someone else's notification is reported
    /// as missing.
    async fn mark_read(&self, principal: &Principal, id: NotificationId) -> Result<(), Error>;
}
