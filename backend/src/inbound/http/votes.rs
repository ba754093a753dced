//! Vote endpoints.
//!
//! ```text
//! POST /api/v1/questions/{id}/votes {"voteType":"APPROVE","value":1}
//! POST /api/v1/answers/{id}/votes   {"voteType":"REJECT","value":-1}
//! ```
//!
//! `value` 1 casts; 0 or -1 retracts a matching vote. Casting the opposite
//! type replaces the caller's existing vote.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::VoteRequest;
use crate::domain::{
    AnswerId, ContentKind, ContentRef, Error, QuestionId, VoteAction, VoteOutcome, VoteType,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, vote_value};

const CONTENT_ID: FieldName = FieldName::new("id");

/// Vote request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VotePayload {
    #[serde(alias = "vote_type")]
    pub vote_type: VoteType,
    /// 1 casts, 0 or -1 retracts.
    #[schema(example = 1)]
    pub value: i64,
}

/// Counters and owner experience after the vote settled.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub action: VoteAction,
    pub kind: ContentKind,
    #[schema(value_type = String)]
    pub content_id: uuid::Uuid,
    pub approve_count: u32,
    pub reject_count: u32,
    pub score: i64,
    /// The content owner's total experience after the change.
    pub owner_experience: u32,
}

impl From<VoteOutcome> for VoteResponse {
    fn from(outcome: VoteOutcome) -> Self {
        Self {
            action: outcome.action,
            kind: outcome.target.kind(),
            content_id: outcome.target.uuid(),
            approve_count: outcome.counters.approve_count,
            reject_count: outcome.counters.reject_count,
            score: outcome.counters.score(),
            owner_experience: outcome.owner_experience,
        }
    }
}

async fn cast(
    state: &HttpState,
    session: &SessionContext,
    target: ContentRef,
    payload: VotePayload,
) -> ApiResult<web::Json<VoteResponse>> {
    let principal = session.require_principal()?;
    let request = VoteRequest {
        target,
        vote_type: payload.vote_type,
        value: vote_value(payload.value)?,
    };
    let outcome = state.votes.cast_vote(&principal, request).await?;
    Ok(web::Json(outcome.into()))
}

/// Cast or retract a vote on a question.
#[utoipa::path(
    post,
    path = "/api/v1/questions/{id}/votes",
    params(("id" = String, Path, description = "Question identifier")),
    request_body = VotePayload,
    responses(
        (status = 200, description = "Vote settled", body = VoteResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Question not found", body = Error),
        (status = 409, description = "Vote already cast", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["votes"],
    operation_id = "voteOnQuestion"
)]
#[post("/questions/{id}/votes")]
pub async fn vote_on_question(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<VotePayload>,
) -> ApiResult<web::Json<VoteResponse>> {
    let id: QuestionId = parse_id(&path.into_inner(), CONTENT_ID)?;
    cast(&state, &session, ContentRef::Question(id), payload.into_inner()).await
}

/// Cast or retract a vote on an answer.
#[utoipa::path(
    post,
    path = "/api/v1/answers/{id}/votes",
    params(("id" = String, Path, description = "Answer identifier")),
    request_body = VotePayload,
    responses(
        (status = 200, description = "Vote settled", body = VoteResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Answer not found", body = Error),
        (status = 409, description = "Vote already cast", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["votes"],
    operation_id = "voteOnAnswer"
)]
#[post("/answers/{id}/votes")]
pub async fn vote_on_answer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<VotePayload>,
) -> ApiResult<web::Json<VoteResponse>> {
    let id: AnswerId = parse_id(&path.into_inner(), CONTENT_ID)?;
    cast(&state, &session, ContentRef::Answer(id), payload.into_inner()).await
}
