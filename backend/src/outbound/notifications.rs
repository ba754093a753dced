//! Notification dispatcher that stores notifications on a spawned task.
//!
//! Delivery is at-most-once: the request is handed to the Tokio runtime and
//! the caller moves on. Storage failures are logged and dropped. The spawned
//! task re-enters the caller's trace scope so its logs correlate with the
//! originating request.

use std::sync::Arc;

use mockable::Clock;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::domain::ports::{NotificationDispatcher, NotificationRepository};
use crate::domain::{Notification, NotificationRequest, TraceId};

/// Dispatcher writing to a [`NotificationRepository`] in the background.
pub struct SpawningNotificationDispatcher<N> {
    repository: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<N> SpawningNotificationDispatcher<N> {
    pub fn new(repository: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

async fn store<N: NotificationRepository>(repository: Arc<N>, notification: Notification) {
    match repository.insert(&notification).await {
        Ok(()) => debug!(
            notification_id = %notification.id,
            recipient = %notification.recipient,
            "notification stored"
        ),
        Err(error) => warn!(
            %error,
            recipient = %notification.recipient,
            "dropping notification after storage failure"
        ),
    }
}

impl<N> NotificationDispatcher for SpawningNotificationDispatcher<N>
where
    N: NotificationRepository + 'static,
{
    fn dispatch(&self, request: NotificationRequest) {
        let Ok(handle) = Handle::try_current() else {
            warn!(recipient = %request.recipient, "no async runtime; notification dropped");
            return;
        };
        let notification = Notification::from_request(request, self.clock.utc());
        let task = store(Arc::clone(&self.repository), notification);
        drop(handle.spawn(TraceId::propagate(task)));
    }
}
