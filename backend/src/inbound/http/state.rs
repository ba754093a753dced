//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AnnouncementQuery, ContentCommand, ContentQuery, ExperienceQuery,
    NotificationInbox, RankingQuery, VoteCommand,
};

/// Dependency bundle for HTTP handlers.
///
/// The server builds one per process, backed either by PostgreSQL adapters
/// or by the in-memory store.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub content: Arc<dyn ContentCommand>,
    pub content_query: Arc<dyn ContentQuery>,
    pub votes: Arc<dyn VoteCommand>,
    pub rankings: Arc<dyn RankingQuery>,
    pub experience: Arc<dyn ExperienceQuery>,
    pub notifications: Arc<dyn NotificationInbox>,
    pub announcements: Arc<dyn AnnouncementQuery>,
}
