//! Fire-and-forget notification side channel.
//!
//! Dispatch is at-most-once and best-effort: callers never wait for the
//! notification to be stored and never observe its failure. Vote and content
//! operations dispatch only after their own writes committed.

use crate::domain::NotificationRequest;

#[cfg_attr(test, mockall::automock)]
pub trait NotificationDispatcher: Send + Sync {
    /// Queue a notification without blocking the caller.
    fn dispatch(&self, request: NotificationRequest);
}

/// Dispatcher that drops every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotificationDispatcher;

impl NotificationDispatcher for NoOpNotificationDispatcher {
    fn dispatch(&self, _request: NotificationRequest) {}
}
