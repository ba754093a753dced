//! Answer endpoints.
//!
//! ```text
//! POST   /api/v1/answers {"questionId":"...","body":"..."}
//! PATCH  /api/v1/answers/{id} {"body":"..."}
//! DELETE /api/v1/answers/{id}
//! ```

use actix_web::{HttpResponse, delete, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::NewAnswer;
use crate::domain::{Answer, AnswerId, Body, Error, QuestionId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, content_error, parse_id};

const ANSWER_ID: FieldName = FieldName::new("id");

/// Body for `POST /api/v1/answers`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnswerRequest {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub question_id: String,
    pub body: String,
}

/// Body for `PATCH /api/v1/answers/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnswerRequest {
    pub body: String,
}

/// An answer as stored, returned after writes.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub id: AnswerId,
    pub question_id: QuestionId,
    #[schema(value_type = String)]
    pub author_id: UserId,
    pub body: String,
    pub approve_count: u32,
    pub reject_count: u32,
    pub score: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Answer> for AnswerResponse {
    fn from(answer: Answer) -> Self {
        Self {
            id: answer.id,
            question_id: answer.question_id,
            author_id: answer.author,
            body: answer.body.into(),
            approve_count: answer.counters.approve_count,
            reject_count: answer.counters.reject_count,
            score: answer.counters.score(),
            created_at: answer.created_at,
            updated_at: answer.updated_at,
        }
    }
}

/// Answer a question. Credits the author and notifies the question owner.
#[utoipa::path(
    post,
    path = "/api/v1/answers",
    request_body = CreateAnswerRequest,
    responses(
        (status = 201, description = "Answer created", body = AnswerResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Question not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["answers"],
    operation_id = "createAnswer"
)]
#[post("/answers")]
pub async fn create_answer(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateAnswerRequest>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let CreateAnswerRequest { question_id, body } = payload.into_inner();
    let answer = NewAnswer {
        question_id: parse_id(&question_id, FieldName::new("questionId"))?,
        body: Body::new(body).map_err(content_error)?,
    };
    let created = state.content.create_answer(&principal, answer).await?;
    Ok(HttpResponse::Created().json(AnswerResponse::from(created)))
}

/// Rewrite an answer's body. Only the author may do this.
#[utoipa::path(
    patch,
    path = "/api/v1/answers/{id}",
    params(("id" = String, Path, description = "Answer identifier")),
    request_body = UpdateAnswerRequest,
    responses(
        (status = 200, description = "Answer updated", body = AnswerResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Answer not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["answers"],
    operation_id = "updateAnswer"
)]
#[patch("/answers/{id}")]
pub async fn update_answer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateAnswerRequest>,
) -> ApiResult<web::Json<AnswerResponse>> {
    let principal = session.require_principal()?;
    let id: AnswerId = parse_id(&path.into_inner(), ANSWER_ID)?;
    let body = Body::new(payload.into_inner().body).map_err(content_error)?;
    let updated = state.content.update_answer(&principal, id, body).await?;
    Ok(web::Json(updated.into()))
}

/// Delete an answer and its votes.
#[utoipa::path(
    delete,
    path = "/api/v1/answers/{id}",
    params(("id" = String, Path, description = "Answer identifier")),
    responses(
        (status = 204, description = "Answer deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Answer not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["answers"],
    operation_id = "deleteAnswer"
)]
#[delete("/answers/{id}")]
pub async fn delete_answer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let id: AnswerId = parse_id(&path.into_inner(), ANSWER_ID)?;
    state.content.delete_answer(&principal, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
