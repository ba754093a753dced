//! Notification inbox service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    NotificationInbox, NotificationPersistenceError, NotificationRepository,
};
use crate::domain::{Error, Notification, NotificationId, Principal};

pub struct NotificationService<N> {
    repository: Arc<N>,
}

impl<N> NotificationService<N> {
    pub fn new(repository: Arc<N>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<N> NotificationInbox for NotificationService<N>
where
    N: NotificationRepository,
{
    async fn list(&self, principal: &Principal) -> Result<Vec<Notification>, Error> {
        self.repository
            .list_for(principal.user_id())
            .await
            .map_err(NotificationPersistenceError::into_api_error)
    }

    async fn mark_read(&self, principal: &Principal, id: NotificationId) -> Result<(), Error> {
        let found = self
            .repository
            .mark_read(principal.user_id(), &id)
            .await
            .map_err(NotificationPersistenceError::into_api_error)?;
        if found {
            Ok(())
        } else {
            Err(Error::not_found("notification not found"))
        }
    }
}
