//! Driving port for reading questions.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{
    AuthoredAnswer, AuthoredQuestion, Error, Principal, QuestionDetail, QuestionId,
    QuestionSummary, SearchText,
};

use super::QuestionSort;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentQuery: Send + Sync {
    /// Load a question with its answers and count the view.
    ///
    /// Drafts are only visible to their author.
    async fn question_detail(
        &self,
        viewer: Option<Principal>,
        id: QuestionId,
    ) -> Result<QuestionDetail, Error>;

    /// One page of published questions.
    async fn list_questions(
        &self,
        sort: QuestionSort,
        page: PageRequest,
    ) -> Result<Paginated<QuestionSummary>, Error>;

    /// Published questions whose title or body contains `text`.
    async fn search_questions(
        &self,
        text: SearchText,
        sort: QuestionSort,
        page: PageRequest,
    ) -> Result<Paginated<QuestionSummary>, Error>;

    /// The principal's questions, drafts included, newest first.
    async fn questions_by(
        &self,
        principal: &Principal,
        page: PageRequest,
    ) -> Result<Paginated<AuthoredQuestion>, Error>;

    /// The principal's answers, newest first.
    async fn answers_by(
        &self,
        principal: &Principal,
        page: PageRequest,
    ) -> Result<Paginated<AuthoredAnswer>, Error>;
}
