//! Notification inbox endpoints.
//!
//! ```text
//! GET  /api/v1/notifications
//! POST /api/v1/notifications/{id}/read
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{Error, Notification, NotificationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// The signed-in member's notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Notifications", body = [Notification]),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Notification>>> {
    let principal = session.require_principal()?;
    let notifications = state.notifications.list(&principal).await?;
    Ok(web::Json(notifications))
}

/// Mark one notification as read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification identifier")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Notification not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/{id}/read")]
pub async fn mark_notification_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let id: NotificationId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    state.notifications.mark_read(&principal, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
