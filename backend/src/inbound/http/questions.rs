//! Question endpoints.
//!
//! ```text
//! GET    /api/v1/questions?sort=popular&page=1&limit=10
//! GET    /api/v1/questions/search?q=borrow&sort=latest
//! POST   /api/v1/questions {"title":"...","body":"...","status":"draft"}
//! GET    /api/v1/questions/{id}
//! PATCH  /api/v1/questions/{id} {"title":"..."}
//! DELETE /api/v1/questions/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use pagination::PageParams;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{NewQuestion, QuestionEdit, QuestionSort};
use crate::domain::{
    Body, Error, Question, QuestionDetail, QuestionId, QuestionStatus, QuestionSummary,
    SearchText, Title, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::PageResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, content_error, empty_edit_error, page_request, parse_id,
};

const QUESTION_ID: FieldName = FieldName::new("id");

/// Query parameters for the question listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuestionsQuery {
    /// `latest` (default) or `popular`.
    pub sort: Option<QuestionSort>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, at most 100.
    pub limit: Option<u32>,
}

/// Query parameters for the question search.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuestionsQuery {
    /// Text to find in titles or bodies, ignoring case.
    pub q: Option<String>,
    pub sort: Option<QuestionSort>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Body for `POST /api/v1/questions`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub title: String,
    pub body: String,
    /// Defaults to `published`.
    #[serde(default)]
    pub status: QuestionStatus,
}

/// Body for `PATCH /api/v1/questions/{id}`. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub status: Option<QuestionStatus>,
}

/// A question as stored, returned after writes.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: QuestionId,
    #[schema(value_type = String)]
    pub author_id: UserId,
    pub title: String,
    pub body: String,
    pub status: QuestionStatus,
    pub approve_count: u32,
    pub reject_count: u32,
    pub score: i64,
    pub views: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            author_id: question.author,
            title: question.title.into(),
            body: question.body.into(),
            status: question.status,
            approve_count: question.counters.approve_count,
            reject_count: question.counters.reject_count,
            score: question.counters.score(),
            views: question.views,
            created_at: question.created_at,
            updated_at: question.updated_at,
        }
    }
}

impl TryFrom<UpdateQuestionRequest> for QuestionEdit {
    type Error = Error;

    fn try_from(value: UpdateQuestionRequest) -> Result<Self, Self::Error> {
        let edit = QuestionEdit {
            title: value.title.map(Title::new).transpose().map_err(content_error)?,
            body: value.body.map(Body::new).transpose().map_err(content_error)?,
            status: value.status,
        };
        if edit.is_empty() {
            return Err(empty_edit_error());
        }
        Ok(edit)
    }
}

/// Published questions, newest or most popular first.
#[utoipa::path(
    get,
    path = "/api/v1/questions",
    params(ListQuestionsQuery),
    responses(
        (status = 200, description = "Questions", body = PageResponse<QuestionSummary>),
        (status = 400, description = "Invalid query", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["questions"],
    operation_id = "listQuestions",
    security([])
)]
#[get("/questions")]
pub async fn list_questions(
    state: web::Data<HttpState>,
    query: web::Query<ListQuestionsQuery>,
) -> ApiResult<web::Json<PageResponse<QuestionSummary>>> {
    let ListQuestionsQuery { sort, page, limit } = query.into_inner();
    let page = page_request(PageParams { page, limit })?;
    let questions = state
        .content_query
        .list_questions(sort.unwrap_or_default(), page)
        .await?;
    Ok(web::Json(questions.into()))
}

/// Published questions whose title or body contains the search text.
#[utoipa::path(
    get,
    path = "/api/v1/questions/search",
    params(SearchQuestionsQuery),
    responses(
        (status = 200, description = "Matching questions", body = PageResponse<QuestionSummary>),
        (status = 400, description = "Missing or invalid search text", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["questions"],
    operation_id = "searchQuestions",
    security([])
)]
#[get("/questions/search")]
pub async fn search_questions(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuestionsQuery>,
) -> ApiResult<web::Json<PageResponse<QuestionSummary>>> {
    let SearchQuestionsQuery {
        q,
        sort,
        page,
        limit,
    } = query.into_inner();
    let text = SearchText::new(q.unwrap_or_default()).map_err(content_error)?;
    let page = page_request(PageParams { page, limit })?;
    let questions = state
        .content_query
        .search_questions(text, sort.unwrap_or_default(), page)
        .await?;
    Ok(web::Json(questions.into()))
}

/// Post a question. Publishing credits the author.
#[utoipa::path(
    post,
    path = "/api/v1/questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created", body = QuestionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["questions"],
    operation_id = "createQuestion"
)]
#[post("/questions")]
pub async fn create_question(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateQuestionRequest>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let CreateQuestionRequest {
        title,
        body,
        status,
    } = payload.into_inner();
    let question = NewQuestion {
        title: Title::new(title).map_err(content_error)?,
        body: Body::new(body).map_err(content_error)?,
        status,
    };
    let created = state.content.create_question(&principal, question).await?;
    Ok(HttpResponse::Created().json(QuestionResponse::from(created)))
}

/// Question with its answers. Drafts are only visible to their author.
#[utoipa::path(
    get,
    path = "/api/v1/questions/{id}",
    params(("id" = String, Path, description = "Question identifier")),
    responses(
        (status = 200, description = "Question detail", body = QuestionDetail),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Question not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["questions"],
    operation_id = "getQuestion",
    security([])
)]
#[get("/questions/{id}")]
pub async fn get_question(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<QuestionDetail>> {
    let id: QuestionId = parse_id(&path.into_inner(), QUESTION_ID)?;
    let viewer = session.principal()?;
    let detail = state.content_query.question_detail(viewer, id).await?;
    Ok(web::Json(detail))
}

/// Edit a question. Only the author may do this; votes are untouched.
#[utoipa::path(
    patch,
    path = "/api/v1/questions/{id}",
    params(("id" = String, Path, description = "Question identifier")),
    request_body = UpdateQuestionRequest,
    responses(
        (status = 200, description = "Question updated", body = QuestionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Question not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["questions"],
    operation_id = "updateQuestion"
)]
#[patch("/questions/{id}")]
pub async fn update_question(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateQuestionRequest>,
) -> ApiResult<web::Json<QuestionResponse>> {
    let principal = session.require_principal()?;
    let id: QuestionId = parse_id(&path.into_inner(), QUESTION_ID)?;
    let edit = QuestionEdit::try_from(payload.into_inner())?;
    let updated = state.content.update_question(&principal, id, edit).await?;
    Ok(web::Json(updated.into()))
}

/// Delete a question with its answers and votes.
#[utoipa::path(
    delete,
    path = "/api/v1/questions/{id}",
    params(("id" = String, Path, description = "Question identifier")),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Question not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["questions"],
    operation_id = "deleteQuestion"
)]
#[delete("/questions/{id}")]
pub async fn delete_question(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let id: QuestionId = parse_id(&path.into_inner(), QUESTION_ID)?;
    state.content.delete_question(&principal, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
