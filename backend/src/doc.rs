//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint from the inbound layer together
//! with the request and response schemas they reference, plus the session
//! cookie security scheme. The document backs Swagger UI in debug builds and
//! is exported via `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Announcement, AnswerView, AuthorActivity, AuthorSummary, AuthoredAnswer, AuthoredQuestion,
    ContentKind, Dashboard, Error, ErrorCode, ExperienceCause, ExperienceEntry, Level,
    Notification, Profile, QuestionDetail, QuestionStatus, QuestionSummary, RankingEntry,
    Standing, VoteAction, VoteType,
};
use crate::inbound::http::accounts::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, SessionResponse, UpdateProfileRequest,
};
use crate::inbound::http::answers::{AnswerResponse, CreateAnswerRequest, UpdateAnswerRequest};
use crate::inbound::http::questions::{
    CreateQuestionRequest, QuestionResponse, UpdateQuestionRequest,
};
use crate::inbound::http::users::{ExperienceHistoryResponse, RankResponse};
use crate::inbound::http::votes::{VotePayload, VoteResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Community Q&A API",
        description = "Questions, answers, votes, experience, and member rankings."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::get_profile,
        crate::inbound::http::accounts::update_profile,
        crate::inbound::http::accounts::change_password,
        crate::inbound::http::users::dashboard,
        crate::inbound::http::users::experience_history,
        crate::inbound::http::users::my_questions,
        crate::inbound::http::users::my_answers,
        crate::inbound::http::users::rankings,
        crate::inbound::http::users::top_rankings,
        crate::inbound::http::users::rank,
        crate::inbound::http::questions::list_questions,
        crate::inbound::http::questions::search_questions,
        crate::inbound::http::questions::create_question,
        crate::inbound::http::questions::get_question,
        crate::inbound::http::questions::update_question,
        crate::inbound::http::questions::delete_question,
        crate::inbound::http::answers::create_answer,
        crate::inbound::http::answers::update_answer,
        crate::inbound::http::answers::delete_answer,
        crate::inbound::http::votes::vote_on_question,
        crate::inbound::http::votes::vote_on_answer,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_notification_read,
        crate::inbound::http::announcements::list_announcements,
        crate::inbound::http::announcements::get_announcement,
        crate::inbound::http::announcements::record_announcement_view,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        SessionResponse,
        Profile,
        UpdateProfileRequest,
        ChangePasswordRequest,
        Dashboard,
        Standing,
        Level,
        AuthorActivity,
        RankingEntry,
        RankResponse,
        ExperienceEntry,
        ExperienceCause,
        ExperienceHistoryResponse,
        CreateQuestionRequest,
        UpdateQuestionRequest,
        QuestionResponse,
        QuestionStatus,
        QuestionSummary,
        QuestionDetail,
        AuthoredQuestion,
        AuthoredAnswer,
        AnswerView,
        AuthorSummary,
        CreateAnswerRequest,
        UpdateAnswerRequest,
        AnswerResponse,
        VotePayload,
        VoteResponse,
        VoteType,
        VoteAction,
        ContentKind,
        Notification,
        Announcement,
    )),
    tags(
        (name = "accounts", description = "Registration, sessions, and the member's own account"),
        (name = "users", description = "Dashboards, experience, and rankings"),
        (name = "questions", description = "Asking and browsing questions"),
        (name = "answers", description = "Answering questions"),
        (name = "votes", description = "Approving and rejecting content"),
        (name = "notifications", description = "Member notification inbox"),
        (name = "announcements", description = "Site-wide announcements"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
