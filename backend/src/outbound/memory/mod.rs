//! In-memory community store.
//!
//! One [`std::sync::Mutex`] guards every table, so each port call is an
//! atomic unit: a vote change validates everything it touches before it
//! mutates anything. The store backs the server when no database URL is
//! configured and drives the cross-layer tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    AnnouncementPersistenceError, AnnouncementRepository, ContentPersistenceError,
    ContentRepository, ExperienceStore, ExperienceStoreError, NotificationPersistenceError,
    NotificationRepository, QuestionSort, UserPersistenceError, UserRepository, VoteChange,
    VoteReceipt, VoteStore, VoteStoreError,
};
use crate::domain::{
    Announcement, AnnouncementId, Answer, AnswerId, AuthorActivity, Content, ContentRef,
    EmailAddress, ExperienceChange, ExperienceEntry, ExperiencePolicy, ExperienceReceipt,
    Notification, NotificationId, PasswordDigest, Question, QuestionId, QuestionStatus,
    SearchText, User, UserId, Vote, VoteCounters, rank_ordering, settle,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    questions: HashMap<QuestionId, Question>,
    answers: HashMap<AnswerId, Answer>,
    votes: HashMap<(UserId, ContentRef), Vote>,
    experience: Vec<ExperienceEntry>,
    notifications: Vec<Notification>,
    announcements: Vec<Announcement>,
}

impl State {
    fn counters(&self, target: ContentRef) -> Option<VoteCounters> {
        match target {
            ContentRef::Question(id) => self.questions.get(&id).map(|q| q.counters),
            ContentRef::Answer(id) => self.answers.get(&id).map(|a| a.counters),
        }
    }

    fn set_counters(&mut self, target: ContentRef, counters: VoteCounters) {
        match target {
            ContentRef::Question(id) => {
                if let Some(question) = self.questions.get_mut(&id) {
                    question.counters = counters;
                }
            }
            ContentRef::Answer(id) => {
                if let Some(answer) = self.answers.get_mut(&id) {
                    answer.counters = counters;
                }
            }
        }
    }

    /// Settle one change against the member's total and append its entry.
    fn settle(
        &mut self,
        change: &ExperienceChange,
        policy: &ExperiencePolicy,
        at: DateTime<Utc>,
    ) -> Option<ExperienceReceipt> {
        let user = self.users.get_mut(&change.user)?;
        let settlement = settle(user.total_experience, change.cause, change.direction, policy);
        user.total_experience = settlement.new_total;
        let entry = ExperienceEntry {
            user: change.user.clone(),
            change: settlement.recorded,
            cause: change.cause,
            recorded_at: at,
        };
        self.experience.push(entry.clone());
        Some(ExperienceReceipt {
            entry,
            new_total: settlement.new_total,
        })
    }

    /// Published questions in `sort` order, narrowed to `text` when given.
    fn published(&self, sort: QuestionSort, text: Option<&SearchText>) -> Vec<&Question> {
        let mut questions: Vec<&Question> = self
            .questions
            .values()
            .filter(|question| question.status == QuestionStatus::Published)
            .filter(|question| {
                text.is_none_or(|text| {
                    text.matches(question.title.as_ref()) || text.matches(question.body.as_ref())
                })
            })
            .collect();
        questions.sort_by(|a, b| {
            let newest = b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id));
            match sort {
                QuestionSort::Latest => newest,
                QuestionSort::Popular => b.counters.score().cmp(&a.counters.score()).then(newest),
            }
        });
        questions
    }

    fn ranked(&self) -> Vec<&User> {
        let mut users: Vec<&User> = self.users.values().collect();
        users.sort_by(|a, b| rank_ordering(a, b));
        users
    }

    fn validate_vote_change(&self, change: &VoteChange) -> Result<(), VoteStoreError> {
        if self.counters(change.target).is_none() {
            return Err(VoteStoreError::content_missing());
        }
        let owner_known = self.users.contains_key(&change.owner)
            && change
                .experience
                .iter()
                .all(|movement| self.users.contains_key(&movement.user));
        if !owner_known {
            return Err(VoteStoreError::user_missing());
        }
        if let Some(old) = &change.remove {
            let held = self.votes.get(&(old.voter.clone(), change.target));
            if held.is_none_or(|vote| vote.id != old.id) {
                return Err(VoteStoreError::vote_missing());
            }
        }
        if let Some(new) = &change.insert {
            let freed = change
                .remove
                .as_ref()
                .is_some_and(|old| old.voter == new.voter);
            if !freed && self.votes.contains_key(&(new.voter.clone(), change.target)) {
                return Err(VoteStoreError::duplicate_vote());
            }
        }
        Ok(())
    }

    fn apply_vote_change(&mut self, change: VoteChange) -> Result<VoteReceipt, VoteStoreError> {
        self.validate_vote_change(&change)?;

        let mut counters = self
            .counters(change.target)
            .ok_or_else(VoteStoreError::content_missing)?;
        if let Some(old) = change.remove {
            self.votes.remove(&(old.voter, change.target));
            counters.decrement(old.vote_type);
        }
        if let Some(new) = change.insert {
            counters.increment(new.vote_type);
            self.votes.insert((new.voter.clone(), change.target), new);
        }
        self.set_counters(change.target, counters);

        let mut entries = Vec::with_capacity(change.experience.len());
        for movement in &change.experience {
            let receipt = self
                .settle(movement, &change.policy, change.at)
                .ok_or_else(VoteStoreError::user_missing)?;
            entries.push(receipt.entry);
        }
        let owner_total = self
            .users
            .get(&change.owner)
            .map(|user| user.total_experience)
            .ok_or_else(VoteStoreError::user_missing)?;

        Ok(VoteReceipt {
            counters,
            entries,
            owner_total,
        })
    }

    fn drop_votes_on(&mut self, targets: &[ContentRef]) {
        self.votes.retain(|(_, target), _| !targets.contains(target));
    }
}

fn page<T>(items: impl Iterator<Item = T>, offset: u64, limit: u32) -> Vec<T> {
    let skip = usize::try_from(offset).unwrap_or(usize::MAX);
    let take = usize::try_from(limit).unwrap_or(usize::MAX);
    items.skip(skip).take(take).collect()
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// Mutex-guarded store implementing every persistence port.
#[derive(Debug, Default)]
pub struct InMemoryCommunityStore {
    state: Mutex<State>,
}

impl InMemoryCommunityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state.lock().map_err(|_| POISONED.to_owned())
    }

    /// Publish an operator announcement.
    pub fn publish_announcement(&self, announcement: Announcement) -> Result<(), String> {
        self.state()?.announcements.push(announcement);
        Ok(())
    }

    /// Record every member's current rank as their previous rank.
    ///
    /// Run periodically so dashboards can report movement since the last
    /// snapshot.
    pub fn snapshot_ranks(&self) -> Result<(), String> {
        let mut state = self.state()?;
        let order: Vec<UserId> = state.ranked().into_iter().map(|u| u.id.clone()).collect();
        for (position, id) in order.iter().enumerate() {
            let rank = u32::try_from(position + 1).unwrap_or(u32::MAX);
            if let Some(user) = state.users.get_mut(id) {
                user.previous_rank = Some(rank);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryCommunityStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.state().map_err(UserPersistenceError::query)?;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(UserPersistenceError::duplicate_email());
        }
        if state.users.values().any(|u| u.nickname == user.nickname) {
            return Err(UserPersistenceError::duplicate_nickname());
        }
        state.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state().map_err(UserPersistenceError::query)?;
        Ok(state.users.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state().map_err(UserPersistenceError::query)?;
        Ok(state.users.values().find(|u| &u.email == email).cloned())
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        let state = self.state().map_err(UserPersistenceError::query)?;
        Ok(count(state.users.len()))
    }

    async fn list_by_experience(
        &self,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.state().map_err(UserPersistenceError::query)?;
        Ok(page(state.ranked().into_iter().cloned(), offset, limit))
    }

    async fn experience_rank(&self, id: &UserId) -> Result<Option<u32>, UserPersistenceError> {
        let state = self.state().map_err(UserPersistenceError::query)?;
        Ok(state
            .ranked()
            .iter()
            .position(|user| &user.id == id)
            .map(|position| u32::try_from(position + 1).unwrap_or(u32::MAX)))
    }

    async fn update_profile(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut state = self.state().map_err(UserPersistenceError::query)?;
        let taken = state
            .users
            .values()
            .any(|other| other.id != user.id && other.nickname == user.nickname);
        if taken {
            return Err(UserPersistenceError::duplicate_nickname());
        }
        let Some(stored) = state.users.get_mut(&user.id) else {
            return Ok(false);
        };
        stored.nickname = user.nickname.clone();
        stored.email_consent = user.email_consent;
        Ok(true)
    }

    async fn update_password(
        &self,
        id: &UserId,
        password: &PasswordDigest,
    ) -> Result<bool, UserPersistenceError> {
        let mut state = self.state().map_err(UserPersistenceError::query)?;
        let Some(stored) = state.users.get_mut(id) else {
            return Ok(false);
        };
        stored.password = password.clone();
        Ok(true)
    }
}

#[async_trait]
impl ContentRepository for InMemoryCommunityStore {
    async fn find_content(
        &self,
        target: ContentRef,
    ) -> Result<Option<Content>, ContentPersistenceError> {
        let state = self.state().map_err(ContentPersistenceError::query)?;
        Ok(match target {
            ContentRef::Question(id) => state.questions.get(&id).cloned().map(Content::Question),
            ContentRef::Answer(id) => state.answers.get(&id).cloned().map(Content::Answer),
        })
    }

    async fn find_question(
        &self,
        id: &QuestionId,
    ) -> Result<Option<Question>, ContentPersistenceError> {
        let state = self.state().map_err(ContentPersistenceError::query)?;
        Ok(state.questions.get(id).cloned())
    }

    async fn find_answer(&self, id: &AnswerId) -> Result<Option<Answer>, ContentPersistenceError> {
        let state = self.state().map_err(ContentPersistenceError::query)?;
        Ok(state.answers.get(id).cloned())
    }

    async fn insert_question(&self, question: &Question) -> Result<(), ContentPersistenceError> {
        let mut state = self.state().map_err(ContentPersistenceError::query)?;
        state.questions.insert(question.id, question.clone());
        Ok(())
    }

    async fn update_question(&self, question: &Question) -> Result<bool, ContentPersistenceError> {
        let mut state = self.state().map_err(ContentPersistenceError::query)?;
        let Some(stored) = state.questions.get_mut(&question.id) else {
            return Ok(false);
        };
        stored.title = question.title.clone();
        stored.body = question.body.clone();
        stored.status = question.status;
        stored.updated_at = question.updated_at;
        Ok(true)
    }

    async fn delete_question(&self, id: &QuestionId) -> Result<bool, ContentPersistenceError> {
        let mut state = self.state().map_err(ContentPersistenceError::query)?;
        if state.questions.remove(id).is_none() {
            return Ok(false);
        }
        let mut targets = vec![ContentRef::Question(*id)];
        state.answers.retain(|answer_id, answer| {
            let orphaned = answer.question_id == *id;
            if orphaned {
                targets.push(ContentRef::Answer(*answer_id));
            }
            !orphaned
        });
        state.drop_votes_on(&targets);
        Ok(true)
    }

    async fn insert_answer(&self, answer: &Answer) -> Result<(), ContentPersistenceError> {
        let mut state = self.state().map_err(ContentPersistenceError::query)?;
        if !state.questions.contains_key(&answer.question_id) {
            return Err(ContentPersistenceError::question_missing());
        }
        state.answers.insert(answer.id, answer.clone());
        Ok(())
    }

    async fn update_answer(&self, answer: &Answer) -> Result<bool, ContentPersistenceError> {
        let mut state = self.state().map_err(ContentPersistenceError::query)?;
        let Some(stored) = state.answers.get_mut(&answer.id) else {
            return Ok(false);
        };
        stored.body = answer.body.clone();
        stored.updated_at = answer.updated_at;
        Ok(true)
    }

    async fn delete_answer(&self, id: &AnswerId) -> Result<bool, ContentPersistenceError> {
        let mut state = self.state().map_err(ContentPersistenceError::query)?;
        if state.answers.remove(id).is_none() {
            return Ok(false);
        }
        state.drop_votes_on(&[ContentRef::Answer(*id)]);
        Ok(true)
    }

    async fn answers_for(
        &self,
        question: &QuestionId,
    ) -> Result<Vec<Answer>, ContentPersistenceError> {
        let state = self.state().map_err(ContentPersistenceError::query)?;
        let mut answers: Vec<Answer> = state
            .answers
            .values()
            .filter(|answer| answer.question_id == *question)
            .cloned()
            .collect();
        answers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(answers)
    }

    async fn increment_views(&self, id: &QuestionId) -> Result<(), ContentPersistenceError> {
        let mut state = self.state().map_err(ContentPersistenceError::query)?;
        if let Some(question) = state.questions.get_mut(id) {
            question.views = question.views.saturating_add(1);
        }
        Ok(())
    }

    async fn list_published_questions(
        &self,
        sort: QuestionSort,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Question>, ContentPersistenceError> {
        let state = self.state().map_err(ContentPersistenceError::query)?;
        let questions = state.published(sort, None);
        Ok(page(questions.into_iter().cloned(), offset, limit))
    }

    async fn count_published_questions(&self) -> Result<u64, ContentPersistenceError> {
        let state = self.state().map_err(ContentPersistenceError::query)?;
        Ok(count(state.published(QuestionSort::Latest, None).len()))
    }

    async fn search_published_questions(
        &self,
        text: &SearchText,
        sort: QuestionSort,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Question>, ContentPersistenceError> {
        let state = self.state().map_err(ContentPersistenceError::query)?;
        let questions = state.published(sort, Some(text));
        Ok(page(questions.into_iter().cloned(), offset, limit))
    }

    async fn count_search_results(
        &self,
        text: &SearchText,
    ) -> Result<u64, ContentPersistenceError> {
        let state = self.state().map_err(ContentPersistenceError::query)?;
        Ok(count(state.published(QuestionSort::Latest, Some(text)).len()))
    }

    async fn questions_by_author(
        &self,
        author: &UserId,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Question>, ContentPersistenceError> {
        let state = self.state().map_err(ContentPersistenceError::query)?;
        let mut questions: Vec<&Question> = state
            .questions
            .values()
            .filter(|question| &question.author == author)
            .collect();
        questions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page(questions.into_iter().cloned(), offset, limit))
    }

    async fn answers_by_author(
        &self,
        author: &UserId,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Answer>, ContentPersistenceError> {
        let state = self.state().map_err(ContentPersistenceError::query)?;
        let mut answers: Vec<&Answer> = state
            .answers
            .values()
            .filter(|answer| &answer.author == author)
            .collect();
        answers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page(answers.into_iter().cloned(), offset, limit))
    }

    async fn answer_counts(
        &self,
        questions: &[QuestionId],
    ) -> Result<HashMap<QuestionId, u32>, ContentPersistenceError> {
        let state = self.state().map_err(ContentPersistenceError::query)?;
        let mut counts = HashMap::new();
        for answer in state.answers.values() {
            if questions.contains(&answer.question_id) {
                let total: &mut u32 = counts.entry(answer.question_id).or_default();
                *total = total.saturating_add(1);
            }
        }
        Ok(counts)
    }

    async fn author_activity(
        &self,
        author: &UserId,
    ) -> Result<AuthorActivity, ContentPersistenceError> {
        let state = self.state().map_err(ContentPersistenceError::query)?;
        let mut activity = AuthorActivity::default();
        for question in state.questions.values().filter(|q| &q.author == author) {
            activity.question_count += 1;
            activity.approvals_received += u64::from(question.counters.approve_count);
        }
        for answer in state.answers.values().filter(|a| &a.author == author) {
            activity.answer_count += 1;
            activity.approvals_received += u64::from(answer.counters.approve_count);
        }
        Ok(activity)
    }
}

#[async_trait]
impl VoteStore for InMemoryCommunityStore {
    async fn find_vote(
        &self,
        voter: &UserId,
        target: ContentRef,
    ) -> Result<Option<Vote>, VoteStoreError> {
        let state = self.state().map_err(VoteStoreError::query)?;
        Ok(state.votes.get(&(voter.clone(), target)).cloned())
    }

    async fn apply(&self, change: VoteChange) -> Result<VoteReceipt, VoteStoreError> {
        let mut state = self.state().map_err(VoteStoreError::query)?;
        state.apply_vote_change(change)
    }
}

#[async_trait]
impl ExperienceStore for InMemoryCommunityStore {
    async fn append(
        &self,
        change: &ExperienceChange,
        policy: ExperiencePolicy,
        at: DateTime<Utc>,
    ) -> Result<ExperienceReceipt, ExperienceStoreError> {
        let mut state = self.state().map_err(ExperienceStoreError::query)?;
        state
            .settle(change, &policy, at)
            .ok_or_else(ExperienceStoreError::user_missing)
    }

    async fn history(&self, user: &UserId) -> Result<Vec<ExperienceEntry>, ExperienceStoreError> {
        let state = self.state().map_err(ExperienceStoreError::query)?;
        if !state.users.contains_key(user) {
            return Err(ExperienceStoreError::user_missing());
        }
        Ok(state
            .experience
            .iter()
            .filter(|entry| &entry.user == user)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryCommunityStore {
    async fn insert(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationPersistenceError> {
        let mut state = self.state().map_err(NotificationPersistenceError::query)?;
        state.notifications.push(notification.clone());
        Ok(())
    }

    async fn list_for(
        &self,
        recipient: &UserId,
    ) -> Result<Vec<Notification>, NotificationPersistenceError> {
        let state = self.state().map_err(NotificationPersistenceError::query)?;
        // Later inserts win timestamp ties; the sort is stable.
        let mut notifications: Vec<Notification> = state
            .notifications
            .iter()
            .rev()
            .filter(|n| &n.recipient == recipient)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    async fn mark_read(
        &self,
        recipient: &UserId,
        id: &NotificationId,
    ) -> Result<bool, NotificationPersistenceError> {
        let mut state = self.state().map_err(NotificationPersistenceError::query)?;
        Ok(state
            .notifications
            .iter_mut()
            .find(|n| &n.id == id && &n.recipient == recipient)
            .map(|n| n.is_read = true)
            .is_some())
    }
}

#[async_trait]
impl AnnouncementRepository for InMemoryCommunityStore {
    async fn list_visible(
        &self,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Announcement>, AnnouncementPersistenceError> {
        let state = self.state().map_err(AnnouncementPersistenceError::query)?;
        let mut visible: Vec<&Announcement> =
            state.announcements.iter().filter(|a| a.is_visible).collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(visible.into_iter().cloned(), offset, limit))
    }

    async fn count_visible(&self) -> Result<u64, AnnouncementPersistenceError> {
        let state = self.state().map_err(AnnouncementPersistenceError::query)?;
        Ok(count(
            state.announcements.iter().filter(|a| a.is_visible).count(),
        ))
    }

    async fn find_visible(
        &self,
        id: &AnnouncementId,
    ) -> Result<Option<Announcement>, AnnouncementPersistenceError> {
        let state = self.state().map_err(AnnouncementPersistenceError::query)?;
        Ok(state
            .announcements
            .iter()
            .find(|a| a.is_visible && &a.id == id)
            .cloned())
    }

    async fn count_view(
        &self,
        id: &AnnouncementId,
    ) -> Result<bool, AnnouncementPersistenceError> {
        let mut state = self.state().map_err(AnnouncementPersistenceError::query)?;
        let Some(announcement) = state
            .announcements
            .iter_mut()
            .find(|a| a.is_visible && &a.id == id)
        else {
            return Ok(false);
        };
        announcement.views = announcement.views.saturating_add(1);
        Ok(true)
    }
}
