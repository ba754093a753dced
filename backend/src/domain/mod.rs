//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed community entities and the business rules
//! that tie votes, content counters, experience, and rank together. Keep
//! types free of transport and persistence concerns; adapters reach them only
//! through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - User, Question, Answer, Vote: community records.
//! - ExperiencePolicy, `settle`, `replay`: experience ledger arithmetic.
//! - LevelTable, Standing, Dashboard: ranking read models.
//! - `*Service` types implementing the driving ports.

pub mod announcement;
pub mod auth;
pub mod content;
pub mod content_view;
pub mod error;
pub mod experience;
pub mod identifiers;
pub mod level;
pub mod notification;
pub mod ports;
pub mod profile;
pub mod ranking;
pub mod trace_id;
pub mod user;
pub mod vote;

mod account_service;
mod announcement_service;
mod content_service;
mod experience_ledger_service;
mod notification_service;
mod ranking_service;
mod service_errors;
mod vote_ledger_service;

pub use self::account_service::AccountService;
pub use self::announcement::Announcement;
pub use self::announcement_service::AnnouncementService;
pub use self::auth::{
    CredentialsValidationError, LoginCredentials, PASSWORD_MIN, PasswordChange,
    PasswordChangeValidationError, Principal, Registration,
};
pub use self::content::{
    Answer, AuthorActivity, BODY_MAX, Body, Content, ContentKind, ContentRef,
    ContentValidationError, Question, QuestionStatus, SEARCH_TEXT_MAX, SearchText, TITLE_MAX,
    Title, Votable, VoteCounters,
};
pub use self::content_service::{ContentService, ContentServiceDeps};
pub use self::content_view::{
    AnswerView, AuthorSummary, AuthoredAnswer, AuthoredQuestion, EXCERPT_CHARS, QuestionDetail,
    QuestionSummary,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::experience::{
    Direction, ExperienceCause, ExperienceChange, ExperienceEntry, ExperiencePolicy,
    ExperienceReceipt, Settlement, replay, settle,
};
pub use self::experience_ledger_service::ExperienceLedgerService;
pub use self::identifiers::{AnnouncementId, AnswerId, NotificationId, QuestionId, VoteId};
pub use self::level::{Level, LevelTable, LevelTableError};
pub use self::notification::{Notification, NotificationRequest};
pub use self::notification_service::NotificationService;
pub use self::profile::{Profile, ProfileEdit};
pub use self::ranking::{
    Dashboard, PODIUM_SIZE, RankingEntry, Standing, TopPercentage, rank_change, rank_ordering,
};
pub use self::ranking_service::RankingService;
pub use self::service_errors::duplicate_vote;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, NICKNAME_MAX, Nickname, PasswordDigest, User, UserId, UserValidationError,
};
pub use self::vote::{InvalidVoteValue, Vote, VoteAction, VoteOutcome, VoteType, VoteValue};
pub use self::vote_ledger_service::VoteLedgerService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
