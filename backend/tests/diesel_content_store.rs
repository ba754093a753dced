//! Integration tests for the search and own-content reads of
//! `DieselContentRepository`.
//!
//! Search must escape LIKE wildcards and skip drafts, while a member's own
//! lists keep them.

use backend::domain::ports::{ContentRepository, QuestionSort, UserRepository};
use backend::domain::{
    Answer, Body, EmailAddress, Nickname, PasswordDigest, Question, QuestionStatus, SearchText,
    Title, User,
};
use backend::outbound::persistence::{
    DbPool, DieselContentRepository, DieselUserRepository, PoolConfig,
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
    _database: TemporaryDatabase,
}

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 10, 9, minute, 0)
        .single()
        .expect("valid timestamp")
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
        content: DieselContentRepository::new(pool),
        _database: temp_db,
    })
}

#[fixture]
fn content_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

impl TestContext {
    fn author(&self) -> User {
        let user = User::register(
            EmailAddress::new("grace@example.com").expect("valid email"),
            Nickname::new("grace").expect("valid nickname"),
            PasswordDigest::new("$argon2id$stub"),
            false,
            at(0),
        );
        self.runtime
            .block_on(self.users.insert(&user))
            .expect("author stored");
        user
    }

    fn ask(&self, author: &User, title: &str, status: QuestionStatus, minute: u32) -> Question {
        let question = Question::new(
            author.id.clone(),
            Title::new(title).expect("valid title"),
            Body::new("Asked while reading the nomicon.").expect("valid body"),
            status,
            at(minute),
        );
        self.runtime
            .block_on(self.content.insert_question(&question))
            .expect("question stored");
        question
    }

    fn search(&self, text: &str) -> (Vec<String>, u64) {
        let text = SearchText::new(text).expect("valid search");
        let found = self
            .runtime
            .block_on(self.content.search_published_questions(
                &text,
                QuestionSort::Latest,
                0,
                10,
            ))
            .expect("search runs");
        let total = self
            .runtime
            .block_on(self.content.count_search_results(&text))
            .expect("count runs");
        let titles = found
            .into_iter()
            .map(|question| question.title.as_ref().to_owned())
            .collect();
        (titles, total)
    }
}

#[rstest]
fn search_ignores_case_drafts_and_wildcards(content_context: Option<TestContext>) {
    let Some(context) = content_context else {
        eprintln!("SKIP-TEST-CLUSTER: search_ignores_case_drafts_and_wildcards skipped");
        return;
    };
    let grace = context.author();
    context.ask(&grace, "How do lifetimes elide?", QuestionStatus::Published, 1);
    context.ask(&grace, "Is 100% safe Rust possible?", QuestionStatus::Published, 2);
    context.ask(&grace, "Lifetimes in trait objects", QuestionStatus::Draft, 3);

    let (titles, total) = context.search("LIFETIMES");
    assert_eq!(titles, vec!["How do lifetimes elide?"]);
    assert_eq!(total, 1);

    let (titles, total) = context.search("100%");
    assert_eq!(titles, vec!["Is 100% safe Rust possible?"]);
    assert_eq!(total, 1);

    let (titles, total) = context.search("%");
    assert_eq!(titles, vec!["Is 100% safe Rust possible?"]);
    assert_eq!(total, 1);

    let (titles, total) = context.search("_");
    assert!(titles.is_empty());
    assert_eq!(total, 0);
}

#[rstest]
fn own_lists_keep_drafts_and_count_answers(content_context: Option<TestContext>) {
    let Some(context) = content_context else {
        eprintln!("SKIP-TEST-CLUSTER: own_lists_keep_drafts_and_count_answers skipped");
        return;
    };
    let grace = context.author();
    let published = context.ask(&grace, "How do lifetimes elide?", QuestionStatus::Published, 1);
    let draft = context.ask(&grace, "Lifetimes in trait objects", QuestionStatus::Draft, 2);
    for minute in [3, 4] {
        let answer = Answer::new(
            published.id,
            grace.id.clone(),
            Body::new("Each elided input gets its own lifetime.").expect("valid body"),
            at(minute),
        );
        context
            .runtime
            .block_on(context.content.insert_answer(&answer))
            .expect("answer stored");
    }

    let mine = context
        .runtime
        .block_on(context.content.questions_by_author(&grace.id, 0, 10))
        .expect("own questions load");
    let ids: Vec<_> = mine.iter().map(|question| question.id).collect();
    assert_eq!(ids, vec![draft.id, published.id]);

    let answers = context
        .runtime
        .block_on(context.content.answers_by_author(&grace.id, 0, 10))
        .expect("own answers load");
    assert_eq!(answers.len(), 2);
    assert!(answers[0].created_at > answers[1].created_at);

    let counts = context
        .runtime
        .block_on(context.content.answer_counts(&[published.id, draft.id]))
        .expect("counts load");
    assert_eq!(counts.get(&published.id), Some(&2));
    assert_eq!(counts.get(&draft.id), None);

    let none = context
        .runtime
        .block_on(context.content.answer_counts(&[]))
        .expect("empty lookup");
    assert!(none.is_empty());
}
