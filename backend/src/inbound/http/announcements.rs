//! Public announcements.
//!
//! ```text
//! GET  /api/v1/announcements?page=1&limit=10
//! GET  /api/v1/announcements/{id}
//! POST /api/v1/announcements/{id}/views
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::PageParams;

use crate::domain::{Announcement, AnnouncementId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::PageResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, page_request, parse_id};

const ANNOUNCEMENT_ID: FieldName = FieldName::new("id");

/// Visible announcements, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/announcements",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Announcements", body = PageResponse<Announcement>),
        (status = 400, description = "Invalid paging parameters", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["announcements"],
    operation_id = "listAnnouncements",
    security([])
)]
#[get("/announcements")]
pub async fn list_announcements(
    state: web::Data<HttpState>,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<PageResponse<Announcement>>> {
    let page = page_request(params.into_inner())?;
    let announcements = state.announcements.list(page).await?;
    Ok(web::Json(announcements.into()))
}

/// One visible announcement. Reading it does not count a view.
#[utoipa::path(
    get,
    path = "/api/v1/announcements/{id}",
    params(("id" = String, Path, description = "Announcement identifier")),
    responses(
        (status = 200, description = "Announcement", body = Announcement),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Announcement not found or hidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["announcements"],
    operation_id = "getAnnouncement",
    security([])
)]
#[get("/announcements/{id}")]
pub async fn get_announcement(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Announcement>> {
    let id: AnnouncementId = parse_id(&path.into_inner(), ANNOUNCEMENT_ID)?;
    let announcement = state.announcements.detail(id).await?;
    Ok(web::Json(announcement))
}

/// Count one view of a visible announcement.
#[utoipa::path(
    post,
    path = "/api/v1/announcements/{id}/views",
    params(("id" = String, Path, description = "Announcement identifier")),
    responses(
        (status = 204, description = "View counted"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Announcement not found or hidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["announcements"],
    operation_id = "recordAnnouncementView",
    security([])
)]
#[post("/announcements/{id}/views")]
pub async fn record_announcement_view(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: AnnouncementId = parse_id(&path.into_inner(), ANNOUNCEMENT_ID)?;
    state.announcements.record_view(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
