//! Port for question and answer persistence.
//!
//! Vote counters are owned by the [`super::VoteStore`]; the update methods
//! here write only the editable fields so an edit never clobbers a concurrent
//! vote.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{
    Answer, AnswerId, AuthorActivity, Content, ContentRef, Question, QuestionId, SearchText,
    UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by content repository adapters.
    pub enum ContentPersistenceError for "content repository" {
        /// The question an answer points at no longer exists.
        QuestionMissing => "the question no longer exists",
    }
}

/// Ordering for the published question listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSort {
    /// Newest first.
    #[default]
    Latest,
    /// Highest score first, newest first among equal scores.
    Popular,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Load either kind of content by reference.
    async fn find_content(
        &self,
        target: ContentRef,
    ) -> Result<Option<Content>, ContentPersistenceError>;

    async fn find_question(
        &self,
        id: &QuestionId,
    ) -> Result<Option<Question>, ContentPersistenceError>;

    async fn find_answer(&self, id: &AnswerId) -> Result<Option<Answer>, ContentPersistenceError>;

    async fn insert_question(&self, question: &Question) -> Result<(), ContentPersistenceError>;

    /// Write title, body, status, and `updated_at`. Returns `false` when the
    /// question is gone.
    async fn update_question(&self, question: &Question) -> Result<bool, ContentPersistenceError>;

    /// Remove a question with its answers and every vote on either.
    async fn delete_question(&self, id: &QuestionId) -> Result<bool, ContentPersistenceError>;

    /// Fails with [`ContentPersistenceError::QuestionMissing`] when the
    /// parent question was deleted.
    async fn insert_answer(&self, answer: &Answer) -> Result<(), ContentPersistenceError>;

    /// Write body and `updated_at`. Returns `false` when the answer is gone.
    async fn update_answer(&self, answer: &Answer) -> Result<bool, ContentPersistenceError>;

    /// Remove an answer and the votes on it.
    async fn delete_answer(&self, id: &AnswerId) -> Result<bool, ContentPersistenceError>;

    /// Answers to a question, oldest first.
    async fn answers_for(
        &self,
        question: &QuestionId,
    ) -> Result<Vec<Answer>, ContentPersistenceError>;

    async fn increment_views(&self, id: &QuestionId) -> Result<(), ContentPersistenceError>;

    async fn list_published_questions(
        &self,
        sort: QuestionSort,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Question>, ContentPersistenceError>;

    async fn count_published_questions(&self) -> Result<u64, ContentPersistenceError>;

    /// Published questions whose title or body contains `text`, ignoring
    /// case, in `sort` order.
    async fn search_published_questions(
        &self,
        text: &SearchText,
        sort: QuestionSort,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Question>, ContentPersistenceError>;

    async fn count_search_results(
        &self,
        text: &SearchText,
    ) -> Result<u64, ContentPersistenceError>;

    /// Questions by `author` in any status, newest first.
    async fn questions_by_author(
        &self,
        author: &UserId,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Question>, ContentPersistenceError>;

    /// Answers by `author`, newest first.
    async fn answers_by_author(
        &self,
        author: &UserId,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Answer>, ContentPersistenceError>;

    /// Answer totals keyed by question. Questions without answers are
    /// omitted.
    async fn answer_counts(
        &self,
        questions: &[QuestionId],
    ) -> Result<HashMap<QuestionId, u32>, ContentPersistenceError>;

    /// Content totals for the dashboard.
    async fn author_activity(
        &self,
        author: &UserId,
    ) -> Result<AuthorActivity, ContentPersistenceError>;
}
