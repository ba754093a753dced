//! Port for stored member notifications.

use async_trait::async_trait;

use crate::domain::{Notification, NotificationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationPersistenceError for "notification repository" {}
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationPersistenceError>;

    /// Notifications addressed to `recipient`, newest first.
    async fn list_for(
        &self,
        recipient: &UserId,
    ) -> Result<Vec<Notification>, NotificationPersistenceError>;

    /// Mark one of the recipient's notifications as read.
    ///
    /// Returns `false` when no such notification belongs to `recipient`.
    async fn mark_read(
        &self,
        recipient: &UserId,
        id: &NotificationId,
    ) -> Result<bool, NotificationPersistenceError>;
}
