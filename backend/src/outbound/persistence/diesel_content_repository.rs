//! PostgreSQL-backed `ContentRepository`.
//!
//! Deletes rely on `ON DELETE CASCADE` to remove answers, votes, and
//! notifications. Edits never touch the vote counters.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::sum;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ContentPersistenceError, ContentRepository, QuestionSort};
use crate::domain::{
    Answer, AnswerId, AuthorActivity, Content, ContentRef, Question, QuestionId, QuestionStatus,
    SearchText, UserId,
};

use super::diesel_helpers::{like_pattern, map_diesel_error, map_pool_error, to_i64, to_u64};
use super::models::{
    AnswerRow, NewAnswerRow, NewQuestionRow, QuestionEditRow, QuestionRow,
};
use super::pool::DbPool;
use super::schema::{answers, questions};

/// Diesel-backed implementation of the [`ContentRepository`] port.
#[derive(Clone)]
pub struct DieselContentRepository {
    pool: DbPool,
}

impl DieselContentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_question(row: QuestionRow) -> Result<Question, ContentPersistenceError> {
    Question::try_from(row).map_err(ContentPersistenceError::query)
}

fn to_answer(row: AnswerRow) -> Result<Answer, ContentPersistenceError> {
    Answer::try_from(row).map_err(ContentPersistenceError::query)
}

async fn load_question(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> Result<Option<Question>, ContentPersistenceError> {
    let row = questions::table
        .find(id)
        .select(QuestionRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    row.map(to_question).transpose()
}

async fn load_answer(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> Result<Option<Answer>, ContentPersistenceError> {
    let row = answers::table
        .find(id)
        .select(AnswerRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    row.map(to_answer).transpose()
}

/// Published questions, narrowed to titles or bodies matching `pattern`.
fn published(pattern: Option<String>) -> questions::BoxedQuery<'static, Pg> {
    let query = questions::table
        .filter(questions::status.eq(QuestionStatus::Published.as_str()))
        .into_boxed();
    match pattern {
        Some(pattern) => query.filter(
            questions::title
                .ilike(pattern.clone())
                .or(questions::body.ilike(pattern)),
        ),
        None => query,
    }
}

fn sorted(
    query: questions::BoxedQuery<'static, Pg>,
    sort: QuestionSort,
) -> questions::BoxedQuery<'static, Pg> {
    match sort {
        QuestionSort::Latest => {
            query.order_by((questions::created_at.desc(), questions::id.desc()))
        }
        QuestionSort::Popular => query.order_by((
            (questions::approve_count - questions::reject_count).desc(),
            questions::created_at.desc(),
            questions::id.desc(),
        )),
    }
}

fn map_answer_insert_error(error: DieselError) -> ContentPersistenceError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info)
            if info.constraint_name().is_some_and(|name| name.contains("question")) =>
        {
            ContentPersistenceError::question_missing()
        }
        other => map_diesel_error(other),
    }
}

#[async_trait]
impl ContentRepository for DieselContentRepository {
    async fn find_content(
        &self,
        target: ContentRef,
    ) -> Result<Option<Content>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        Ok(match target {
            ContentRef::Question(id) => load_question(&mut conn, *id.as_uuid())
                .await?
                .map(Content::Question),
            ContentRef::Answer(id) => load_answer(&mut conn, *id.as_uuid())
                .await?
                .map(Content::Answer),
        })
    }

    async fn find_question(
        &self,
        id: &QuestionId,
    ) -> Result<Option<Question>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_question(&mut conn, *id.as_uuid()).await
    }

    async fn find_answer(&self, id: &AnswerId) -> Result<Option<Answer>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_answer(&mut conn, *id.as_uuid()).await
    }

    async fn insert_question(&self, question: &Question) -> Result<(), ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(questions::table)
            .values(NewQuestionRow::from(question))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update_question(&self, question: &Question) -> Result<bool, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(questions::table.find(*question.id.as_uuid()))
            .set(QuestionEditRow::from(question))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_question(&self, id: &QuestionId) -> Result<bool, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(questions::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn insert_answer(&self, answer: &Answer) -> Result<(), ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(answers::table)
            .values(NewAnswerRow::from(answer))
            .execute(&mut conn)
            .await
            .map_err(map_answer_insert_error)?;
        Ok(())
    }

    async fn update_answer(&self, answer: &Answer) -> Result<bool, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(answers::table.find(*answer.id.as_uuid()))
            .set((
                answers::body.eq(answer.body.as_ref()),
                answers::updated_at.eq(answer.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete_answer(&self, id: &AnswerId) -> Result<bool, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(answers::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn answers_for(
        &self,
        question: &QuestionId,
    ) -> Result<Vec<Answer>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = answers::table
            .filter(answers::question_id.eq(*question.as_uuid()))
            .order((answers::created_at.asc(), answers::id.asc()))
            .select(AnswerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_answer).collect()
    }

    async fn increment_views(&self, id: &QuestionId) -> Result<(), ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(questions::table.find(*id.as_uuid()))
            .set(questions::views.eq(questions::views + 1))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_published_questions(
        &self,
        sort: QuestionSort,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Question>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = sorted(published(None), sort)
            .select(QuestionRow::as_select())
            .offset(to_i64(offset))
            .limit(i64::from(limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_question).collect()
    }

    async fn count_published_questions(&self) -> Result<u64, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = published(None)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(to_u64(total))
    }

    async fn search_published_questions(
        &self,
        text: &SearchText,
        sort: QuestionSort,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Question>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = sorted(published(Some(like_pattern(text.as_ref()))), sort)
            .select(QuestionRow::as_select())
            .offset(to_i64(offset))
            .limit(i64::from(limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_question).collect()
    }

    async fn count_search_results(
        &self,
        text: &SearchText,
    ) -> Result<u64, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = published(Some(like_pattern(text.as_ref())))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(to_u64(total))
    }

    async fn questions_by_author(
        &self,
        author: &UserId,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Question>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = questions::table
            .filter(questions::author_id.eq(*author.as_uuid()))
            .order((questions::created_at.desc(), questions::id.desc()))
            .offset(to_i64(offset))
            .limit(i64::from(limit))
            .select(QuestionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_question).collect()
    }

    async fn answers_by_author(
        &self,
        author: &UserId,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Answer>, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = answers::table
            .filter(answers::author_id.eq(*author.as_uuid()))
            .order((answers::created_at.desc(), answers::id.desc()))
            .offset(to_i64(offset))
            .limit(i64::from(limit))
            .select(AnswerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_answer).collect()
    }

    async fn answer_counts(
        &self,
        questions: &[QuestionId],
    ) -> Result<HashMap<QuestionId, u32>, ContentPersistenceError> {
        if questions.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<Uuid> = questions.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(Uuid, i64)> = answers::table
            .filter(answers::question_id.eq_any(ids))
            .group_by(answers::question_id)
            .select((answers::question_id, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(id, total)| {
                (QuestionId::from_uuid(id), u32::try_from(total).unwrap_or(u32::MAX))
            })
            .collect())
    }

    async fn author_activity(
        &self,
        author: &UserId,
    ) -> Result<AuthorActivity, ContentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let author = *author.as_uuid();
        let (question_count, question_approvals): (i64, Option<i64>) = questions::table
            .filter(questions::author_id.eq(author))
            .select((diesel::dsl::count_star(), sum(questions::approve_count)))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let (answer_count, answer_approvals): (i64, Option<i64>) = answers::table
            .filter(answers::author_id.eq(author))
            .select((diesel::dsl::count_star(), sum(answers::approve_count)))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(AuthorActivity {
            question_count: to_u64(question_count),
            answer_count: to_u64(answer_count),
            approvals_received: to_u64(question_approvals.unwrap_or_default())
                .saturating_add(to_u64(answer_approvals.unwrap_or_default())),
        })
    }
}
