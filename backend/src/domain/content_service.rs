//! Question and answer service.
//!
//! Creating content credits its author and deleting it debits the same
//! reward. Experience earned from votes on deleted content is kept.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{PageRequest, Paginated};

use crate::domain::ports::{
    ContentCommand, ContentQuery, ContentRepository, ExperienceStore, NewAnswer, NewQuestion,
    NotificationDispatcher, QuestionEdit, QuestionSort, UserRepository, VoteStore,
};
use crate::domain::service_errors::{map_content_error, map_user_error, map_vote_error};
use crate::domain::{
    Answer, AnswerId, AnswerView, AuthorSummary, AuthoredAnswer, AuthoredQuestion, Body,
    ContentRef, Error, ExperienceCause, ExperienceLedgerService, LevelTable, NotificationRequest,
    Principal, Question, QuestionDetail, QuestionId, QuestionSummary, SearchText, UserId, VoteType,
};

/// Collaborators for [`ContentService`].
pub struct ContentServiceDeps<C, U, V, X> {
    pub content: Arc<C>,
    pub users: Arc<U>,
    pub votes: Arc<V>,
    pub ledger: ExperienceLedgerService<X>,
    pub notifier: Arc<dyn NotificationDispatcher>,
    pub levels: Arc<LevelTable>,
    pub clock: Arc<dyn Clock>,
}

/// Content service implementing [`ContentCommand`] and [`ContentQuery`].
pub struct ContentService<C, U, V, X> {
    content: Arc<C>,
    users: Arc<U>,
    votes: Arc<V>,
    ledger: ExperienceLedgerService<X>,
    notifier: Arc<dyn NotificationDispatcher>,
    levels: Arc<LevelTable>,
    clock: Arc<dyn Clock>,
}

impl<C, U, V, X> ContentService<C, U, V, X> {
    pub fn new(deps: ContentServiceDeps<C, U, V, X>) -> Self {
        let ContentServiceDeps {
            content,
            users,
            votes,
            ledger,
            notifier,
            levels,
            clock,
        } = deps;
        Self {
            content,
            users,
            votes,
            ledger,
            notifier,
            levels,
            clock,
        }
    }
}

fn ensure_owner(principal: &Principal, owner: &UserId, what: &str) -> Result<(), Error> {
    if principal.owns(owner) {
        Ok(())
    } else {
        Err(Error::forbidden(format!("only the author may change this {what}")))
    }
}

impl<C, U, V, X> ContentService<C, U, V, X>
where
    C: ContentRepository,
    U: UserRepository,
    V: VoteStore,
    X: ExperienceStore,
{
    async fn load_question(&self, id: &QuestionId) -> Result<Question, Error> {
        self.content
            .find_question(id)
            .await
            .map_err(map_content_error)?
            .ok_or_else(|| Error::not_found("question not found"))
    }

    async fn load_answer(&self, id: &AnswerId) -> Result<Answer, Error> {
        self.content
            .find_answer(id)
            .await
            .map_err(map_content_error)?
            .ok_or_else(|| Error::not_found("answer not found"))
    }

    async fn author(
        &self,
        cache: &mut HashMap<UserId, AuthorSummary>,
        id: &UserId,
    ) -> Result<AuthorSummary, Error> {
        if let Some(summary) = cache.get(id) {
            return Ok(summary.clone());
        }
        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::internal(format!("author {id} is missing")))?;
        let summary = AuthorSummary::new(&user, &self.levels);
        cache.insert(id.clone(), summary.clone());
        Ok(summary)
    }

    async fn approved_by(
        &self,
        viewer: Option<&Principal>,
        target: ContentRef,
    ) -> Result<bool, Error> {
        let Some(viewer) = viewer else {
            return Ok(false);
        };
        let vote = self
            .votes
            .find_vote(viewer.user_id(), target)
            .await
            .map_err(map_vote_error)?;
        Ok(vote.is_some_and(|v| v.vote_type == VoteType::Approve))
    }
}

#[async_trait]
impl<C, U, V, X> ContentCommand for ContentService<C, U, V, X>
where
    C: ContentRepository,
    U: UserRepository,
    V: VoteStore,
    X: ExperienceStore,
{
    async fn create_question(
        &self,
        principal: &Principal,
        question: NewQuestion,
    ) -> Result<Question, Error> {
        let NewQuestion {
            title,
            body,
            status,
        } = question;
        let question = Question::new(
            principal.user_id().clone(),
            title,
            body,
            status,
            self.clock.utc(),
        );
        self.content
            .insert_question(&question)
            .await
            .map_err(map_content_error)?;
        self.ledger
            .credit(principal.user_id(), ExperienceCause::Question)
            .await?;
        Ok(question)
    }

    async fn update_question(
        &self,
        principal: &Principal,
        id: QuestionId,
        edit: QuestionEdit,
    ) -> Result<Question, Error> {
        let mut question = self.load_question(&id).await?;
        ensure_owner(principal, &question.author, "question")?;
        if edit.is_empty() {
            return Ok(question);
        }

        let QuestionEdit {
            title,
            body,
            status,
        } = edit;
        if let Some(title) = title {
            question.title = title;
        }
        if let Some(body) = body {
            question.body = body;
        }
        if let Some(status) = status {
            question.status = status;
        }
        question.updated_at = self.clock.utc();

        let updated = self
            .content
            .update_question(&question)
            .await
            .map_err(map_content_error)?;
        if !updated {
            return Err(Error::not_found("question not found"));
        }
        Ok(question)
    }

    async fn delete_question(&self, principal: &Principal, id: QuestionId) -> Result<(), Error> {
        let question = self.load_question(&id).await?;
        ensure_owner(principal, &question.author, "question")?;
        let deleted = self
            .content
            .delete_question(&id)
            .await
            .map_err(map_content_error)?;
        if !deleted {
            return Err(Error::not_found("question not found"));
        }
        self.ledger
            .debit(&question.author, ExperienceCause::Question)
            .await?;
        Ok(())
    }

    async fn create_answer(
        &self,
        principal: &Principal,
        answer: NewAnswer,
    ) -> Result<Answer, Error> {
        let question = self.load_question(&answer.question_id).await?;
        if !question.is_visible_to(Some(principal.user_id())) {
            return Err(Error::not_found("question not found"));
        }

        let answer = Answer::new(
            question.id,
            principal.user_id().clone(),
            answer.body,
            self.clock.utc(),
        );
        self.content
            .insert_answer(&answer)
            .await
            .map_err(map_content_error)?;
        self.ledger
            .credit(principal.user_id(), ExperienceCause::Answer)
            .await?;

        if !principal.owns(&question.author) {
            self.notifier.dispatch(NotificationRequest::new_answer(
                question.author.clone(),
                question.id,
                answer.id,
                question.title.as_ref(),
            ));
        }
        Ok(answer)
    }

    async fn update_answer(
        &self,
        principal: &Principal,
        id: AnswerId,
        body: Body,
    ) -> Result<Answer, Error> {
        let mut answer = self.load_answer(&id).await?;
        ensure_owner(principal, &answer.author, "answer")?;
        answer.body = body;
        answer.updated_at = self.clock.utc();

        let updated = self
            .content
            .update_answer(&answer)
            .await
            .map_err(map_content_error)?;
        if !updated {
            return Err(Error::not_found("answer not found"));
        }
        Ok(answer)
    }

    async fn delete_answer(&self, principal: &Principal, id: AnswerId) -> Result<(), Error> {
        let answer = self.load_answer(&id).await?;
        ensure_owner(principal, &answer.author, "answer")?;
        let deleted = self
            .content
            .delete_answer(&id)
            .await
            .map_err(map_content_error)?;
        if !deleted {
            return Err(Error::not_found("answer not found"));
        }
        self.ledger
            .debit(&answer.author, ExperienceCause::Answer)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<C, U, V, X> ContentQuery for ContentService<C, U, V, X>
where
    C: ContentRepository,
    U: UserRepository,
    V: VoteStore,
    X: ExperienceStore,
{
    async fn question_detail(
        &self,
        viewer: Option<Principal>,
        id: QuestionId,
    ) -> Result<QuestionDetail, Error> {
        let viewer = viewer.as_ref();
        let mut question = self.load_question(&id).await?;
        if !question.is_visible_to(viewer.map(Principal::user_id)) {
            return Err(Error::not_found("question not found"));
        }
        self.content
            .increment_views(&id)
            .await
            .map_err(map_content_error)?;
        question.views = question.views.saturating_add(1);

        let mut authors = HashMap::new();
        let question_author = self.author(&mut authors, &question.author).await?;
        let question_approved = self
            .approved_by(viewer, ContentRef::Question(question.id))
            .await?;

        let answers = self
            .content
            .answers_for(&id)
            .await
            .map_err(map_content_error)?;
        let mut views = Vec::with_capacity(answers.len());
        for answer in &answers {
            let author = self.author(&mut authors, &answer.author).await?;
            let approved = self
                .approved_by(viewer, ContentRef::Answer(answer.id))
                .await?;
            views.push(AnswerView::new(answer, author, approved));
        }

        Ok(QuestionDetail::new(
            &question,
            question_author,
            question_approved,
            views,
        ))
    }

    async fn list_questions(
        &self,
        sort: QuestionSort,
        page: PageRequest,
    ) -> Result<Paginated<QuestionSummary>, Error> {
        let total = self
            .content
            .count_published_questions()
            .await
            .map_err(map_content_error)?;
        let questions = self
            .content
            .list_published_questions(sort, page.offset(), page.limit())
            .await
            .map_err(map_content_error)?;
        let items = questions.iter().map(QuestionSummary::from).collect();
        Ok(Paginated::new(items, page, total))
    }

    async fn search_questions(
        &self,
        text: SearchText,
        sort: QuestionSort,
        page: PageRequest,
    ) -> Result<Paginated<QuestionSummary>, Error> {
        let total = self
            .content
            .count_search_results(&text)
            .await
            .map_err(map_content_error)?;
        let questions = self
            .content
            .search_published_questions(&text, sort, page.offset(), page.limit())
            .await
            .map_err(map_content_error)?;
        let items = questions.iter().map(QuestionSummary::from).collect();
        Ok(Paginated::new(items, page, total))
    }

    async fn questions_by(
        &self,
        principal: &Principal,
        page: PageRequest,
    ) -> Result<Paginated<AuthoredQuestion>, Error> {
        let author = principal.user_id();
        let activity = self
            .content
            .author_activity(author)
            .await
            .map_err(map_content_error)?;
        let questions = self
            .content
            .questions_by_author(author, page.offset(), page.limit())
            .await
            .map_err(map_content_error)?;
        let ids: Vec<QuestionId> = questions.iter().map(|question| question.id).collect();
        let answers = self
            .content
            .answer_counts(&ids)
            .await
            .map_err(map_content_error)?;
        let items = questions
            .iter()
            .map(|question| {
                let count = answers.get(&question.id).copied().unwrap_or_default();
                AuthoredQuestion::new(question, count)
            })
            .collect();
        Ok(Paginated::new(items, page, activity.question_count))
    }

    async fn answers_by(
        &self,
        principal: &Principal,
        page: PageRequest,
    ) -> Result<Paginated<AuthoredAnswer>, Error> {
        let author = principal.user_id();
        let activity = self
            .content
            .author_activity(author)
            .await
            .map_err(map_content_error)?;
        let answers = self
            .content
            .answers_by_author(author, page.offset(), page.limit())
            .await
            .map_err(map_content_error)?;
        let items = answers.iter().map(AuthoredAnswer::from).collect();
        Ok(Paginated::new(items, page, activity.answer_count))
    }
}

#[cfg(test)]
#[path = "content_service_tests.rs"]
mod tests;
