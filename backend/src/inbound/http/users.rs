//! Member standing endpoints.
//!
//! ```text
//! GET /api/v1/users/me/dashboard
//! GET /api/v1/users/me/experience
//! GET /api/v1/users/me/questions?page=1&limit=10
//! GET /api/v1/users/me/answers?page=1&limit=10
//! GET /api/v1/users/rankings?page=1&limit=10
//! GET /api/v1/users/rankings/top
//! GET /api/v1/users/{id}/rank
//! ```

use actix_web::{get, web};
use pagination::PageParams;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    AuthoredAnswer, AuthoredQuestion, Dashboard, Error, ExperienceEntry, RankingEntry, UserId,
    replay,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::PageResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, page_request, parse_id};

/// A member's position in the community ordering.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    #[schema(value_type = String)]
    pub user_id: UserId,
    /// 1-based rank; ties on experience go to the earlier member.
    pub rank: u32,
}

/// The caller's experience ledger, oldest entry first.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceHistoryResponse {
    pub entries: Vec<ExperienceEntry>,
    /// Total obtained by replaying the entries with a floor at zero.
    pub total: u32,
}

/// Dashboard for the signed-in member.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = Dashboard),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Member no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getDashboard"
)]
#[get("/users/me/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Dashboard>> {
    let principal = session.require_principal()?;
    let dashboard = state.rankings.dashboard(principal.user_id()).await?;
    Ok(web::Json(dashboard))
}

/// Experience history for the signed-in member.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/experience",
    responses(
        (status = 200, description = "Experience history", body = ExperienceHistoryResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Member no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getExperienceHistory"
)]
#[get("/users/me/experience")]
pub async fn experience_history(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ExperienceHistoryResponse>> {
    let principal = session.require_principal()?;
    let entries = state.experience.history(principal.user_id()).await?;
    let total = replay(&entries);
    Ok(web::Json(ExperienceHistoryResponse { entries, total }))
}

/// The signed-in member's questions, drafts included, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/questions",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Own questions", body = PageResponse<AuthoredQuestion>),
        (status = 400, description = "Invalid paging parameters", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listMyQuestions"
)]
#[get("/users/me/questions")]
pub async fn my_questions(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<PageResponse<AuthoredQuestion>>> {
    let principal = session.require_principal()?;
    let page = page_request(params.into_inner())?;
    let questions = state.content_query.questions_by(&principal, page).await?;
    Ok(web::Json(questions.into()))
}

/// The signed-in member's answers, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/answers",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Own answers", body = PageResponse<AuthoredAnswer>),
        (status = 400, description = "Invalid paging parameters", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listMyAnswers"
)]
#[get("/users/me/answers")]
pub async fn my_answers(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<PageResponse<AuthoredAnswer>>> {
    let principal = session.require_principal()?;
    let page = page_request(params.into_inner())?;
    let answers = state.content_query.answers_by(&principal, page).await?;
    Ok(web::Json(answers.into()))
}

/// Community leaderboard.
#[utoipa::path(
    get,
    path = "/api/v1/users/rankings",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Ranked members", body = PageResponse<RankingEntry>),
        (status = 400, description = "Invalid paging parameters", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listRankings",
    security([])
)]
#[get("/users/rankings")]
pub async fn rankings(
    state: web::Data<HttpState>,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<PageResponse<RankingEntry>>> {
    let page = page_request(params.into_inner())?;
    let rankings = state.rankings.rankings(page).await?;
    Ok(web::Json(rankings.into()))
}

/// The leading members of the community.
#[utoipa::path(
    get,
    path = "/api/v1/users/rankings/top",
    responses(
        (status = 200, description = "Podium, best first", body = Vec<RankingEntry>),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listTopRankings",
    security([])
)]
#[get("/users/rankings/top")]
pub async fn top_rankings(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<RankingEntry>>> {
    let podium = state.rankings.top().await?;
    Ok(web::Json(podium))
}

/// Rank of one member.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/rank",
    params(("id" = String, Path, description = "Member identifier")),
    responses(
        (status = 200, description = "Rank", body = RankResponse),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Unknown member", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getRank",
    security([])
)]
#[get("/users/{id}/rank")]
pub async fn rank(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RankResponse>> {
    let user_id: UserId = parse_id(&path.into_inner(), FieldName::new("id"))?;
    let rank = state.rankings.rank(&user_id).await?;
    Ok(web::Json(RankResponse { user_id, rank }))
}

#[cfg(test)]
mod tests;
