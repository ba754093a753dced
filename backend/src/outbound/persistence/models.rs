//! Internal Diesel row structs and their domain conversions.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Reading a row re-validates it through the
//! domain constructors; a row that fails is reported as a query error rather
//! than silently repaired.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Announcement, AnnouncementId, Answer, AnswerId, Body, ContentRef, EmailAddress,
    ExperienceEntry, Nickname, Notification, NotificationId, PasswordDigest, Question,
    QuestionId, Title, User, UserId, Vote, VoteCounters, VoteId,
};

use super::diesel_helpers::{to_i32, to_u32};
use super::schema::{
    announcements, answers, experience_entries, notifications, questions, users, votes,
};

/// Reason a stored row could not be turned into a domain value.
pub(crate) type RowError = String;

fn invalid(column: &str, error: impl std::fmt::Display) -> RowError {
    format!("stored {column} is invalid: {error}")
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
    pub email_consent: bool,
    pub total_experience: i32,
    pub previous_rank: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub nickname: &'a str,
    pub password_hash: &'a str,
    pub email_consent: bool,
    pub total_experience: i32,
    pub previous_rank: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            email: user.email.as_ref(),
            nickname: user.nickname.as_ref(),
            password_hash: user.password.as_str(),
            email_consent: user.email_consent,
            total_experience: to_i32(user.total_experience),
            previous_rank: user.previous_rank.map(to_i32),
            created_at: user.created_at,
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = RowError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            email: EmailAddress::new(&row.email).map_err(|err| invalid("email", err))?,
            nickname: Nickname::new(row.nickname).map_err(|err| invalid("nickname", err))?,
            password: PasswordDigest::new(row.password_hash),
            email_consent: row.email_consent,
            total_experience: to_u32(row.total_experience),
            previous_rank: row.previous_rank.map(to_u32),
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Questions and answers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QuestionRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub status: String,
    pub approve_count: i32,
    pub reject_count: i32,
    pub views: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = questions)]
pub(crate) struct NewQuestionRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: &'a str,
    pub body: &'a str,
    pub status: &'a str,
    pub approve_count: i32,
    pub reject_count: i32,
    pub views: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable question fields; counters are owned by the vote store.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = questions)]
pub(crate) struct QuestionEditRow<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub status: &'a str,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Question> for NewQuestionRow<'a> {
    fn from(question: &'a Question) -> Self {
        Self {
            id: *question.id.as_uuid(),
            author_id: *question.author.as_uuid(),
            title: question.title.as_ref(),
            body: question.body.as_ref(),
            status: question.status.as_str(),
            approve_count: to_i32(question.counters.approve_count),
            reject_count: to_i32(question.counters.reject_count),
            views: to_i32(question.views),
            created_at: question.created_at,
            updated_at: question.updated_at,
        }
    }
}

impl<'a> From<&'a Question> for QuestionEditRow<'a> {
    fn from(question: &'a Question) -> Self {
        Self {
            title: question.title.as_ref(),
            body: question.body.as_ref(),
            status: question.status.as_str(),
            updated_at: question.updated_at,
        }
    }
}

impl TryFrom<QuestionRow> for Question {
    type Error = RowError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: QuestionId::from_uuid(row.id),
            author: UserId::from_uuid(row.author_id),
            title: Title::new(row.title).map_err(|err| invalid("title", err))?,
            body: Body::new(row.body).map_err(|err| invalid("body", err))?,
            status: row.status.parse().map_err(|err| invalid("status", err))?,
            counters: VoteCounters::new(to_u32(row.approve_count), to_u32(row.reject_count)),
            views: to_u32(row.views),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = answers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AnswerRow {
    pub id: Uuid,
    pub question_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub approve_count: i32,
    pub reject_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = answers)]
pub(crate) struct NewAnswerRow<'a> {
    pub id: Uuid,
    pub question_id: Uuid,
    pub author_id: Uuid,
    pub body: &'a str,
    pub approve_count: i32,
    pub reject_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Answer> for NewAnswerRow<'a> {
    fn from(answer: &'a Answer) -> Self {
        Self {
            id: *answer.id.as_uuid(),
            question_id: *answer.question_id.as_uuid(),
            author_id: *answer.author.as_uuid(),
            body: answer.body.as_ref(),
            approve_count: to_i32(answer.counters.approve_count),
            reject_count: to_i32(answer.counters.reject_count),
            created_at: answer.created_at,
            updated_at: answer.updated_at,
        }
    }
}

impl TryFrom<AnswerRow> for Answer {
    type Error = RowError;

    fn try_from(row: AnswerRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AnswerId::from_uuid(row.id),
            question_id: QuestionId::from_uuid(row.question_id),
            author: UserId::from_uuid(row.author_id),
            body: Body::new(row.body).map_err(|err| invalid("body", err))?,
            counters: VoteCounters::new(to_u32(row.approve_count), to_u32(row.reject_count)),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Votes and experience
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = votes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VoteRow {
    pub id: Uuid,
    pub voter_id: Uuid,
    pub question_id: Option<Uuid>,
    pub answer_id: Option<Uuid>,
    pub vote_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = votes)]
pub(crate) struct NewVoteRow<'a> {
    pub id: Uuid,
    pub voter_id: Uuid,
    pub question_id: Option<Uuid>,
    pub answer_id: Option<Uuid>,
    pub vote_type: &'a str,
    pub created_at: DateTime<Utc>,
}

impl From<&Vote> for NewVoteRow<'static> {
    fn from(vote: &Vote) -> Self {
        let (question_id, answer_id) = match vote.target {
            ContentRef::Question(id) => (Some(*id.as_uuid()), None),
            ContentRef::Answer(id) => (None, Some(*id.as_uuid())),
        };
        Self {
            id: *vote.id.as_uuid(),
            voter_id: *vote.voter.as_uuid(),
            question_id,
            answer_id,
            vote_type: vote.vote_type.as_str(),
            created_at: vote.created_at,
        }
    }
}

impl TryFrom<VoteRow> for Vote {
    type Error = RowError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        let target = match (row.question_id, row.answer_id) {
            (Some(id), None) => ContentRef::Question(QuestionId::from_uuid(id)),
            (None, Some(id)) => ContentRef::Answer(AnswerId::from_uuid(id)),
            _ => return Err(invalid("vote target", "exactly one target must be set")),
        };
        Ok(Self {
            id: VoteId::from_uuid(row.id),
            voter: UserId::from_uuid(row.voter_id),
            target,
            vote_type: row.vote_type.parse().map_err(|err| invalid("vote type", err))?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = experience_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExperienceEntryRow {
    #[expect(dead_code, reason = "ordering key; entries are exposed without it")]
    pub id: i64,
    pub user_id: Uuid,
    pub change: i32,
    pub cause: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = experience_entries)]
pub(crate) struct NewExperienceEntryRow<'a> {
    pub user_id: Uuid,
    pub change: i32,
    pub cause: &'a str,
    pub recorded_at: DateTime<Utc>,
}

impl From<&ExperienceEntry> for NewExperienceEntryRow<'static> {
    fn from(entry: &ExperienceEntry) -> Self {
        Self {
            user_id: *entry.user.as_uuid(),
            change: entry.change,
            cause: entry.cause.as_str(),
            recorded_at: entry.recorded_at,
        }
    }
}

impl TryFrom<ExperienceEntryRow> for ExperienceEntry {
    type Error = RowError;

    fn try_from(row: ExperienceEntryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user: UserId::from_uuid(row.user_id),
            change: row.change,
            cause: row.cause.parse().map_err(|err| invalid("cause", err))?,
            recorded_at: row.recorded_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Notifications and announcements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub question_id: Uuid,
    pub answer_id: Option<Uuid>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationRow {
    fn from(notification: &Notification) -> Self {
        Self {
            id: *notification.id.as_uuid(),
            recipient_id: *notification.recipient.as_uuid(),
            question_id: *notification.question_id.as_uuid(),
            answer_id: notification.answer_id.map(|id| *id.as_uuid()),
            message: notification.message.clone(),
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: NotificationId::from_uuid(row.id),
            recipient: UserId::from_uuid(row.recipient_id),
            question_id: QuestionId::from_uuid(row.question_id),
            answer_id: row.answer_id.map(AnswerId::from_uuid),
            message: row.message,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = announcements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AnnouncementRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub is_visible: bool,
    pub views: i32,
    pub created_at: DateTime<Utc>,
}

impl From<AnnouncementRow> for Announcement {
    fn from(row: AnnouncementRow) -> Self {
        Self {
            id: AnnouncementId::from_uuid(row.id),
            title: row.title,
            content: row.content,
            is_visible: row.is_visible,
            views: to_u32(row.views),
            created_at: row.created_at,
        }
    }
}
