//! Notifications delivered to members about activity on their content.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{AnswerId, NotificationId, QuestionId, UserId};

/// Request to notify a member. Dispatched best-effort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub recipient: UserId,
    pub question_id: QuestionId,
    pub answer_id: Option<AnswerId>,
    pub message: String,
}

impl NotificationRequest {
    /// Tell a question's author that someone answered it.
    pub fn new_answer(
        recipient: UserId,
        question_id: QuestionId,
        answer_id: AnswerId,
        question_title: &str,
    ) -> Self {
        Self {
            recipient,
            question_id,
            answer_id: Some(answer_id),
            message: format!("Your question \"{question_title}\" received a new answer."),
        }
    }

    /// Tell a content owner that their question or answer was approved.
    pub fn approval(
        recipient: UserId,
        question_id: QuestionId,
        answer_id: Option<AnswerId>,
    ) -> Self {
        let subject = if answer_id.is_some() {
            "answer"
        } else {
            "question"
        };
        Self {
            recipient,
            question_id,
            answer_id,
            message: format!("Your {subject} received an approval."),
        }
    }
}

/// A stored notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(skip)]
    pub recipient: UserId,
    pub question_id: QuestionId,
    pub answer_id: Option<AnswerId>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Materialise a request as an unread notification.
    pub fn from_request(request: NotificationRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            id: NotificationId::random(),
            recipient: request.recipient,
            question_id: request.question_id,
            answer_id: request.answer_id,
            message: request.message,
            is_read: false,
            created_at,
        }
    }
}
