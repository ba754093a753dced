//! Site-wide announcements published by the operators.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::AnnouncementId;

/// A published announcement. Only visible ones are listed to members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub content: String,
    #[serde(skip)]
    pub is_visible: bool,
    pub views: u32,
    pub created_at: DateTime<Utc>,
}
