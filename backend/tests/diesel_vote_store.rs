//! Integration tests for `DieselVoteStore`.
//!
//! Runs the atomic vote write path against embedded PostgreSQL: the unique
//! vote index, counter bookkeeping, and rollback when any step fails.

use backend::domain::ports::{
    ContentRepository, UserRepository, VoteChange, VoteStore, VoteStoreError,
};
use backend::domain::{
    Body, ContentRef, EmailAddress, ExperienceCause, ExperienceChange, ExperiencePolicy,
    Nickname, PasswordDigest, Question, QuestionStatus, Title, User, UserId, Vote, VoteCounters,
    VoteType,
};
use backend::outbound::persistence::{
    DbPool, DieselContentRepository, DieselUserRepository, DieselVoteStore, PoolConfig,
};
use chrono::{DateTime, TimeZone, Utc};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

mod support;

use support::{handle_cluster_setup_failure, provision_database, shared_cluster};

struct TestContext {
    runtime: Runtime,
    users: DieselUserRepository,
    content: DieselContentRepository,
    votes: DieselVoteStore,
    _database: TemporaryDatabase,
}

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 10, 9, minute, 0)
        .single()
        .expect("valid timestamp")
}

fn member(nickname: &str) -> User {
    User::register(
        EmailAddress::new(format!("{nickname}@example.com")).expect("valid email"),
        Nickname::new(nickname).expect("valid nickname"),
        PasswordDigest::new("$argon2id$stub"),
        false,
        at(0),
    )
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let temp_db = provision_database(cluster)?;

    let config = PoolConfig::new(temp_db.url()).with_max_connections(2);
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        users: DieselUserRepository::new(pool.clone()),
        content: DieselContentRepository::new(pool.clone()),
        votes: DieselVoteStore::new(pool),
        _database: temp_db,
    })
}

#[fixture]
fn vote_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

impl TestContext {
    /// An owner with one published question and a voter, both stored.
    fn seed(&self) -> (User, User, Question) {
        let owner = member("grace");
        let voter = member("ada");
        let question = Question::new(
            owner.id.clone(),
            Title::new("Why is the borrow checker upset?").expect("valid title"),
            Body::new("It says the value does not live long enough.").expect("valid body"),
            QuestionStatus::Published,
            at(1),
        );
        self.runtime.block_on(async {
            self.users.insert(&owner).await.expect("owner stored");
            self.users.insert(&voter).await.expect("voter stored");
            self.content
                .insert_question(&question)
                .await
                .expect("question stored");
        });
        (owner, voter, question)
    }

    fn counters(&self, question: &Question) -> VoteCounters {
        self.runtime
            .block_on(self.content.find_question(&question.id))
            .expect("question lookup")
            .expect("question present")
            .counters
    }

    fn total(&self, id: &UserId) -> u32 {
        self.runtime
            .block_on(self.users.find_by_id(id))
            .expect("user lookup")
            .expect("user present")
            .total_experience
    }
}

/// Cast `vote` or retract `retract`, moving the owner's approval reward.
fn approval(owner: &User, vote: Option<&Vote>, retract: Option<&Vote>, minute: u32) -> VoteChange {
    let reward = |change: fn(UserId, ExperienceCause) -> ExperienceChange| {
        vec![change(owner.id.clone(), ExperienceCause::ApproveVote)]
    };
    let (target, experience) = match (vote, retract) {
        (Some(cast), _) => (cast.target, reward(ExperienceChange::credit)),
        (None, Some(old)) => (old.target, reward(ExperienceChange::debit)),
        (None, None) => panic!("a vote to insert or remove"),
    };
    VoteChange {
        target,
        owner: owner.id.clone(),
        remove: retract.cloned(),
        insert: vote.cloned(),
        experience,
        policy: ExperiencePolicy::default(),
        at: at(minute),
    }
}

#[rstest]
fn cast_then_retract_restores_counters_and_total(vote_context: Option<TestContext>) {
    let Some(context) = vote_context else {
        eprintln!("SKIP-TEST-CLUSTER: cast_then_retract_restores_counters_and_total skipped");
        return;
    };
    let (owner, voter, question) = context.seed();
    let target = ContentRef::Question(question.id);
    let vote = Vote::new(voter.id.clone(), target, VoteType::Approve, at(2));

    let cast = context
        .runtime
        .block_on(context.votes.apply(approval(&owner, Some(&vote), None, 2)))
        .expect("cast commits");
    assert_eq!(cast.counters, VoteCounters::new(1, 0));
    assert_eq!(cast.owner_total, 20);
    assert_eq!(cast.entries.len(), 1);

    let stored = context
        .runtime
        .block_on(context.votes.find_vote(&voter.id, target))
        .expect("vote lookup");
    assert_eq!(stored.as_ref().map(|v| v.id), Some(vote.id));

    let retracted = context
        .runtime
        .block_on(context.votes.apply(approval(&owner, None, Some(&vote), 3)))
        .expect("retraction commits");
    assert_eq!(retracted.counters, VoteCounters::default());
    assert_eq!(retracted.owner_total, 0);

    assert_eq!(context.counters(&question), VoteCounters::default());
    assert_eq!(context.total(&owner.id), 0);
    let gone = context
        .runtime
        .block_on(context.votes.find_vote(&voter.id, target))
        .expect("vote lookup");
    assert!(gone.is_none());
}

#[rstest]
fn duplicate_cast_conflicts_and_rolls_back(vote_context: Option<TestContext>) {
    let Some(context) = vote_context else {
        eprintln!("SKIP-TEST-CLUSTER: duplicate_cast_conflicts_and_rolls_back skipped");
        return;
    };
    let (owner, voter, question) = context.seed();
    let target = ContentRef::Question(question.id);
    let first = Vote::new(voter.id.clone(), target, VoteType::Approve, at(2));
    let second = Vote::new(voter.id.clone(), target, VoteType::Approve, at(3));

    context
        .runtime
        .block_on(context.votes.apply(approval(&owner, Some(&first), None, 2)))
        .expect("first cast commits");
    let err = context
        .runtime
        .block_on(context.votes.apply(approval(&owner, Some(&second), None, 3)))
        .expect_err("second cast conflicts");

    assert_eq!(err, VoteStoreError::duplicate_vote());
    assert_eq!(context.counters(&question), VoteCounters::new(1, 0));
    assert_eq!(context.total(&owner.id), 20);
}

#[rstest]
fn removing_a_vanished_vote_reports_it_missing(vote_context: Option<TestContext>) {
    let Some(context) = vote_context else {
        eprintln!("SKIP-TEST-CLUSTER: removing_a_vanished_vote_reports_it_missing skipped");
        return;
    };
    let (owner, voter, question) = context.seed();
    let never_stored = Vote::new(
        voter.id.clone(),
        ContentRef::Question(question.id),
        VoteType::Approve,
        at(2),
    );

    let err = context
        .runtime
        .block_on(context.votes.apply(approval(&owner, None, Some(&never_stored), 2)))
        .expect_err("nothing to remove");

    assert_eq!(err, VoteStoreError::vote_missing());
    assert_eq!(context.counters(&question), VoteCounters::default());
    assert_eq!(context.total(&owner.id), 0);
}

#[rstest]
fn votes_on_deleted_content_report_it_missing(vote_context: Option<TestContext>) {
    let Some(context) = vote_context else {
        eprintln!("SKIP-TEST-CLUSTER: votes_on_deleted_content_report_it_missing skipped");
        return;
    };
    let (owner, voter, question) = context.seed();
    context
        .runtime
        .block_on(context.content.delete_question(&question.id))
        .expect("question deleted");
    let vote = Vote::new(
        voter.id.clone(),
        ContentRef::Question(question.id),
        VoteType::Approve,
        at(2),
    );

    let err = context
        .runtime
        .block_on(context.votes.apply(approval(&owner, Some(&vote), None, 2)))
        .expect_err("content is gone");

    assert_eq!(err, VoteStoreError::content_missing());
    assert_eq!(context.total(&owner.id), 0);
}
