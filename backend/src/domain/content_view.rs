//! Read models for questions and answers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    Answer, AnswerId, Level, LevelTable, Question, QuestionId, QuestionStatus, User, UserId,
};

/// Characters of body text shown in a member's own content lists.
pub const EXCERPT_CHARS: usize = 100;

/// The first [`EXCERPT_CHARS`] characters of `body`.
fn excerpt(body: &str) -> String {
    body.chars().take(EXCERPT_CHARS).collect()
}

/// Public identity of a content author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    #[schema(value_type = String)]
    pub user_id: UserId,
    pub nickname: String,
    pub level: Level,
}

impl AuthorSummary {
    pub fn new(user: &User, levels: &LevelTable) -> Self {
        Self {
            user_id: user.id.clone(),
            nickname: user.nickname.to_string(),
            level: levels.level_for(user.total_experience).clone(),
        }
    }
}

/// Question row in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub id: QuestionId,
    #[schema(value_type = String)]
    pub author_id: UserId,
    pub title: String,
    pub approve_count: u32,
    pub reject_count: u32,
    pub score: i64,
    pub views: u32,
    pub created_at: DateTime<Utc>,
}

impl From<&Question> for QuestionSummary {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            author_id: question.author.clone(),
            title: question.title.as_ref().to_owned(),
            approve_count: question.counters.approve_count,
            reject_count: question.counters.reject_count,
            score: question.counters.score(),
            views: question.views,
            created_at: question.created_at,
        }
    }
}

/// An answer as shown under its question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerView {
    pub id: AnswerId,
    pub author: AuthorSummary,
    pub body: String,
    pub approve_count: u32,
    pub reject_count: u32,
    pub score: i64,
    /// Whether the viewing member holds an approval on this answer.
    pub approved_by_viewer: bool,
    pub edited: bool,
    pub created_at: DateTime<Utc>,
}

impl AnswerView {
    pub fn new(answer: &Answer, author: AuthorSummary, approved_by_viewer: bool) -> Self {
        Self {
            id: answer.id,
            author,
            body: answer.body.as_ref().to_owned(),
            approve_count: answer.counters.approve_count,
            reject_count: answer.counters.reject_count,
            score: answer.counters.score(),
            approved_by_viewer,
            edited: answer.is_edited(),
            created_at: answer.created_at,
        }
    }
}

/// A question with its answers, as seen by one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetail {
    pub id: QuestionId,
    pub author: AuthorSummary,
    pub title: String,
    pub body: String,
    pub status: QuestionStatus,
    pub approve_count: u32,
    pub reject_count: u32,
    pub score: i64,
    pub views: u32,
    pub approved_by_viewer: bool,
    pub edited: bool,
    pub created_at: DateTime<Utc>,
    pub answers: Vec<AnswerView>,
}

impl QuestionDetail {
    pub fn new(
        question: &Question,
        author: AuthorSummary,
        approved_by_viewer: bool,
        answers: Vec<AnswerView>,
    ) -> Self {
        Self {
            id: question.id,
            author,
            title: question.title.as_ref().to_owned(),
            body: question.body.as_ref().to_owned(),
            status: question.status,
            approve_count: question.counters.approve_count,
            reject_count: question.counters.reject_count,
            score: question.counters.score(),
            views: question.views,
            approved_by_viewer,
            edited: question.is_edited(),
            created_at: question.created_at,
            answers,
        }
    }
}

/// One of the signed-in member's questions, drafts included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthoredQuestion {
    pub id: QuestionId,
    pub title: String,
    pub excerpt: String,
    pub status: QuestionStatus,
    pub approve_count: u32,
    pub answer_count: u32,
    pub views: u32,
    pub created_at: DateTime<Utc>,
}

impl AuthoredQuestion {
    pub fn new(question: &Question, answer_count: u32) -> Self {
        Self {
            id: question.id,
            title: question.title.as_ref().to_owned(),
            excerpt: excerpt(question.body.as_ref()),
            status: question.status,
            approve_count: question.counters.approve_count,
            answer_count,
            views: question.views,
            created_at: question.created_at,
        }
    }
}

/// One of the signed-in member's answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthoredAnswer {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub excerpt: String,
    pub approve_count: u32,
    pub created_at: DateTime<Utc>,
}

impl From<&Answer> for AuthoredAnswer {
    fn from(answer: &Answer) -> Self {
        Self {
            id: answer.id,
            question_id: answer.question_id,
            excerpt: excerpt(answer.body.as_ref()),
            approve_count: answer.counters.approve_count,
            created_at: answer.created_at,
        }
    }
}
