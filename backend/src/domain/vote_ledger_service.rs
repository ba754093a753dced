//! Vote ledger service.
//!
//! Resolves a vote request against the voter's existing vote, then hands the
//! store one [`VoteChange`] to apply atomically. Content under another
//! member's draft question is reported as missing. Approvals notify the content
//! owner after the change commits.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    ContentRepository, NotificationDispatcher, VoteChange, VoteCommand, VoteRequest, VoteStore,
};
use crate::domain::service_errors::{duplicate_vote, map_content_error, map_vote_error};
use crate::domain::{
    Content, ContentRef, Error, ExperienceCause, ExperienceChange, ExperiencePolicy,
    NotificationRequest, Principal, UserId, Votable, Vote, VoteAction, VoteOutcome, VoteType,
    VoteValue,
};

/// Vote ledger service implementing [`VoteCommand`].
pub struct VoteLedgerService<C, V> {
    content: Arc<C>,
    votes: Arc<V>,
    notifier: Arc<dyn NotificationDispatcher>,
    policy: ExperiencePolicy,
    clock: Arc<dyn Clock>,
}

impl<C, V> VoteLedgerService<C, V> {
    pub fn new(
        content: Arc<C>,
        votes: Arc<V>,
        notifier: Arc<dyn NotificationDispatcher>,
        policy: ExperiencePolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            content,
            votes,
            notifier,
            policy,
            clock,
        }
    }
}

fn cast_experience(
    policy: &ExperiencePolicy,
    owner: &UserId,
    vote_type: VoteType,
) -> Option<ExperienceChange> {
    policy
        .vote_moves_experience(vote_type)
        .then(|| ExperienceChange::credit(owner.clone(), ExperienceCause::ApproveVote))
}

fn retraction_experience(
    policy: &ExperiencePolicy,
    owner: &UserId,
    vote_type: VoteType,
) -> Option<ExperienceChange> {
    (policy.retractions_debit_experience && policy.vote_moves_experience(vote_type))
        .then(|| ExperienceChange::debit(owner.clone(), ExperienceCause::ApproveVote))
}

/// Decide what a request does given the voter's current vote.
///
/// Casting the held type is a duplicate. Casting the other type replaces the
/// held vote. Retracting removes only a vote of the requested type and is a
/// no-op otherwise.
pub(crate) fn plan_vote(
    policy: &ExperiencePolicy,
    voter: &UserId,
    content: &Content,
    existing: Option<Vote>,
    request: &VoteRequest,
    now: DateTime<Utc>,
) -> Result<(VoteAction, VoteChange), Error> {
    let owner = content.owner().clone();
    let mut change = VoteChange {
        target: request.target,
        owner: owner.clone(),
        remove: None,
        insert: None,
        experience: Vec::new(),
        policy: *policy,
        at: now,
    };

    let action = match (request.value, existing) {
        (VoteValue::Cast, Some(held)) if held.vote_type == request.vote_type => {
            return Err(duplicate_vote());
        }
        (VoteValue::Cast, held) => {
            let action = if held.is_some() {
                VoteAction::Switched
            } else {
                VoteAction::Cast
            };
            if let Some(held) = held {
                change
                    .experience
                    .extend(retraction_experience(policy, &owner, held.vote_type));
                change.remove = Some(held);
            }
            change
                .experience
                .extend(cast_experience(policy, &owner, request.vote_type));
            change.insert = Some(Vote::new(
                voter.clone(),
                request.target,
                request.vote_type,
                now,
            ));
            action
        }
        (VoteValue::Retract, Some(held)) if held.vote_type == request.vote_type => {
            change
                .experience
                .extend(retraction_experience(policy, &owner, held.vote_type));
            change.remove = Some(held);
            VoteAction::Retracted
        }
        (VoteValue::Retract, _) => VoteAction::Unchanged,
    };

    Ok((action, change))
}

impl<C, V> VoteLedgerService<C, V>
where
    C: ContentRepository,
    V: VoteStore,
{
    /// Load the target, treating content under someone else's draft as
    /// missing.
    async fn load_votable_content(
        &self,
        principal: &Principal,
        target: ContentRef,
    ) -> Result<Content, Error> {
        let not_found = || Error::not_found(format!("{} not found", target.kind().as_str()));
        let content = self
            .content
            .find_content(target)
            .await
            .map_err(map_content_error)?
            .ok_or_else(not_found)?;

        let visible = match &content {
            Content::Question(question) => question.is_visible_to(Some(principal.user_id())),
            Content::Answer(answer) => self
                .content
                .find_question(&answer.question_id)
                .await
                .map_err(map_content_error)?
                .is_some_and(|question| question.is_visible_to(Some(principal.user_id()))),
        };
        if visible { Ok(content) } else { Err(not_found()) }
    }

    fn notify_approval(&self, content: &Content) {
        let answer_id = match content.content_ref() {
            ContentRef::Answer(id) => Some(id),
            ContentRef::Question(_) => None,
        };
        self.notifier.dispatch(NotificationRequest::approval(
            content.owner().clone(),
            content.question_id(),
            answer_id,
        ));
    }
}

#[async_trait]
impl<C, V> VoteCommand for VoteLedgerService<C, V>
where
    C: ContentRepository,
    V: VoteStore,
{
    async fn cast_vote(
        &self,
        principal: &Principal,
        request: VoteRequest,
    ) -> Result<VoteOutcome, Error> {
        let content = self
            .load_votable_content(principal, request.target)
            .await?;
        let existing = self
            .votes
            .find_vote(principal.user_id(), request.target)
            .await
            .map_err(map_vote_error)?;

        let (action, change) = plan_vote(
            &self.policy,
            principal.user_id(),
            &content,
            existing,
            &request,
            self.clock.utc(),
        )?;
        let receipt = self.votes.apply(change).await.map_err(map_vote_error)?;
        debug!(
            target = %request.target,
            vote_type = request.vote_type.as_str(),
            ?action,
            owner_total = receipt.owner_total,
            "vote applied"
        );

        let approved = matches!(action, VoteAction::Cast | VoteAction::Switched)
            && request.vote_type == VoteType::Approve;
        if approved {
            self.notify_approval(&content);
        }

        Ok(VoteOutcome {
            action,
            target: request.target,
            counters: receipt.counters,
            owner_experience: receipt.owner_total,
        })
    }
}

#[cfg(test)]
#[path = "vote_ledger_service_tests.rs"]
mod tests;
