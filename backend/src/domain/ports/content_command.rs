//! Driving port for writing questions and answers.

use async_trait::async_trait;

use crate::domain::{
    Answer, AnswerId, Body, Error, Principal, Question, QuestionId, QuestionStatus, Title,
};

/// Payload for a new question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub title: Title,
    pub body: Body,
    pub status: QuestionStatus,
}

/// Partial question update; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionEdit {
    pub title: Option<Title>,
    pub body: Option<Body>,
    pub status: Option<QuestionStatus>,
}

impl QuestionEdit {
    /// Whether the edit changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.status.is_none()
    }
}

/// Payload for a new answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswer {
    pub question_id: QuestionId,
    pub body: Body,
}

/// Creating content credits the author; deleting it debits the same reward.
/// Only the author may edit or delete.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentCommand: Send + Sync {
    async fn create_question(
        &self,
        principal: &Principal,
        question: NewQuestion,
    ) -> Result<Question, Error>;

    async fn update_question(
        &self,
        principal: &Principal,
        id: QuestionId,
        edit: QuestionEdit,
    ) -> Result<Question, Error>;

    async fn delete_question(&self, principal: &Principal, id: QuestionId) -> Result<(), Error>;

    async fn create_answer(&self, principal: &Principal, answer: NewAnswer)
    -> Result<Answer, Error>;

    async fn update_answer(
        &self,
        principal: &Principal,
        id: AnswerId,
        body: Body,
    ) -> Result<Answer, Error>;

    async fn delete_answer(&self, principal: &Principal, id: AnswerId) -> Result<(), Error>;
}
