//! Questions, answers, and the vote counters they carry.
//!
//! Both kinds of content are owned by exactly one member and carry
//! independent approve and reject counters. The shared capability is the
//! [`Votable`] trait; [`Content`] is the tagged union the vote ledger loads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AnswerId, QuestionId, UserId, VoteType};

/// Maximum accepted question title length, in characters.
pub const TITLE_MAX: usize = 200;
/// Maximum accepted question or answer body length, in characters.
pub const BODY_MAX: usize = 20_000;
/// Maximum accepted search text length, in characters.
pub const SEARCH_TEXT_MAX: usize = 100;

/// Validation errors raised by the content value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("body must not be empty")]
    EmptyBody,
    #[error("body must be at most {max} characters")]
    BodyTooLong { max: usize },
    #[error("search text must not be empty")]
    EmptySearch,
    #[error("search text must be at most {max} characters")]
    SearchTooLong { max: usize },
}

/// Validated question title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Validate and construct a title; surrounding whitespace is trimmed.
    pub fn new(title: impl AsRef<str>) -> Result<Self, ContentValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ContentValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(ContentValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}

impl TryFrom<String> for Title {
    type Error = ContentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated body text shared by questions and answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Body(String);

impl Body {
    /// Validate and construct a body. Inner formatting is preserved.
    pub fn new(body: impl Into<String>) -> Result<Self, ContentValidationError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(ContentValidationError::EmptyBody);
        }
        if body.chars().count() > BODY_MAX {
            return Err(ContentValidationError::BodyTooLong { max: BODY_MAX });
        }
        Ok(Self(body))
    }
}

impl AsRef<str> for Body {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Body> for String {
    fn from(value: Body) -> Self {
        value.0
    }
}

impl TryFrom<String> for Body {
    type Error = ContentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Text a question search looks for.
///
/// Matching is a case-insensitive substring test against the title and the
/// body.
///
/// # Examples
/// ```
/// use backend::domain::SearchText;
///
/// let text = SearchText::new("  Borrow ").unwrap();
/// assert!(text.matches("Why does the borrow checker complain?"));
/// assert!(!text.matches("Lifetimes"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchText(String);

impl SearchText {
    /// Validate and construct search text; surrounding whitespace is trimmed.
    pub fn new(text: impl AsRef<str>) -> Result<Self, ContentValidationError> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ContentValidationError::EmptySearch);
        }
        if trimmed.chars().count() > SEARCH_TEXT_MAX {
            return Err(ContentValidationError::SearchTooLong {
                max: SEARCH_TEXT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Whether `haystack` contains the text, ignoring case.
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0.to_lowercase())
    }
}

impl AsRef<str> for SearchText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Publication state of a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    Draft,
    #[default]
    Published,
}

impl QuestionStatus {
    /// Stable storage label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl std::str::FromStr for QuestionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            other => Err(format!("unknown question status: {other}")),
        }
    }
}

/// Denormalised vote tallies stored on content.
///
/// Counters never go negative: decrements saturate at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteCounters {
    pub approve_count: u32,
    pub reject_count: u32,
}

impl VoteCounters {
    /// Construct counters from stored values.
    pub const fn new(approve_count: u32, reject_count: u32) -> Self {
        Self {
            approve_count,
            reject_count,
        }
    }

    /// Approvals minus rejections.
    pub fn score(&self) -> i64 {
        i64::from(self.approve_count) - i64::from(self.reject_count)
    }

    /// Count one more vote of `vote_type`.
    pub fn increment(&mut self, vote_type: VoteType) {
        match vote_type {
            VoteType::Approve => self.approve_count = self.approve_count.saturating_add(1),
            VoteType::Reject => self.reject_count = self.reject_count.saturating_add(1),
        }
    }

    /// Remove one vote of `vote_type`, flooring at zero.
    pub fn decrement(&mut self, vote_type: VoteType) {
        match vote_type {
            VoteType::Approve => self.approve_count = self.approve_count.saturating_sub(1),
            VoteType::Reject => self.reject_count = self.reject_count.saturating_sub(1),
        }
    }
}

/// Discriminates the two kinds of votable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Question,
    Answer,
}

impl ContentKind {
    /// Stable storage label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Answer => "answer",
        }
    }
}

/// Reference to exactly one question or answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ContentRef {
    Question(QuestionId),
    Answer(AnswerId),
}

impl ContentRef {
    /// Which kind of content this reference points at.
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Question(_) => ContentKind::Question,
            Self::Answer(_) => ContentKind::Answer,
        }
    }

    /// The raw UUID of the referenced record.
    pub fn uuid(&self) -> uuid::Uuid {
        match self {
            Self::Question(id) => *id.as_uuid(),
            Self::Answer(id) => *id.as_uuid(),
        }
    }
}

impl std::fmt::Display for ContentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind().as_str(), self.uuid())
    }
}

/// Content totals for one member, shown on their dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorActivity {
    pub question_count: u64,
    pub answer_count: u64,
    /// Approvals summed across every question and answer the member owns.
    pub approvals_received: u64,
}

/// Shared capability of everything that can be voted on.
pub trait Votable {
    /// Member who receives experience for approvals.
    fn owner(&self) -> &UserId;
    /// Current vote tallies.
    fn counters(&self) -> VoteCounters;
    /// Reference used to key votes on this content.
    fn content_ref(&self) -> ContentRef;
}

/// A question posted by a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub author: UserId,
    pub title: Title,
    pub body: Body,
    pub status: QuestionStatus,
    pub counters: VoteCounters,
    pub views: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    /// Build a new question with empty counters.
    pub fn new(
        author: UserId,
        title: Title,
        body: Body,
        status: QuestionStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: QuestionId::random(),
            author,
            title,
            body,
            status,
            counters: VoteCounters::default(),
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the question was changed after it was posted.
    pub fn is_edited(&self) -> bool {
        self.updated_at != self.created_at
    }

    /// Drafts are visible only to their author; published questions to all.
    pub fn is_visible_to(&self, viewer: Option<&UserId>) -> bool {
        match self.status {
            QuestionStatus::Published => true,
            QuestionStatus::Draft => viewer == Some(&self.author),
        }
    }
}

impl Votable for Question {
    fn owner(&self) -> &UserId {
        &self.author
    }

    fn counters(&self) -> VoteCounters {
        self.counters
    }

    fn content_ref(&self) -> ContentRef {
        ContentRef::Question(self.id)
    }
}

/// An answer to a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub author: UserId,
    pub body: Body,
    pub counters: VoteCounters,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Answer {
    /// Build a new answer with empty counters.
    pub fn new(question_id: QuestionId, author: UserId, body: Body, now: DateTime<Utc>) -> Self {
        Self {
            id: AnswerId::random(),
            question_id,
            author,
            body,
            counters: VoteCounters::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the answer was changed after it was posted.
    pub fn is_edited(&self) -> bool {
        self.updated_at != self.created_at
    }
}

impl Votable for Answer {
    fn owner(&self) -> &UserId {
        &self.author
    }

    fn counters(&self) -> VoteCounters {
        self.counters
    }

    fn content_ref(&self) -> ContentRef {
        ContentRef::Answer(self.id)
    }
}

/// Either kind of votable content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Question(Question),
    Answer(Answer),
}

impl Content {
    /// The question this content belongs to; a question belongs to itself.
    pub fn question_id(&self) -> QuestionId {
        match self {
            Self::Question(question) => question.id,
            Self::Answer(answer) => answer.question_id,
        }
    }

    fn as_votable(&self) -> &dyn Votable {
        match self {
            Self::Question(question) => question as &dyn Votable,
            Self::Answer(answer) => answer as &dyn Votable,
        }
    }
}

impl Votable for Content {
    fn owner(&self) -> &UserId {
        self.as_votable().owner()
    }

    fn counters(&self) -> VoteCounters {
        self.as_votable().counters()
    }

    fn content_ref(&self) -> ContentRef {
        self.as_votable().content_ref()
    }
}
