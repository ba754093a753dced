//! Tests for the content service.

use super::*;
use crate::domain::ports::{
    MockContentRepository, MockExperienceStore, MockNotificationDispatcher, MockUserRepository,
    MockVoteStore,
};
use crate::domain::{
    AuthorActivity, EmailAddress, ErrorCode, ExperienceEntry, ExperiencePolicy, ExperienceReceipt,
    Nickname, PasswordDigest, QuestionStatus, Title, User, Vote,
};
use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

struct Harness {
    content: MockContentRepository,
    users: MockUserRepository,
    votes: MockVoteStore,
    experience: MockExperienceStore,
    notifier: MockNotificationDispatcher,
}

#[fixture]
fn harness() -> Harness {
    Harness {
        content: MockContentRepository::new(),
        users: MockUserRepository::new(),
        votes: MockVoteStore::new(),
        experience: MockExperienceStore::new(),
        notifier: MockNotificationDispatcher::new(),
    }
}

type Service =
    ContentService<MockContentRepository, MockUserRepository, MockVoteStore, MockExperienceStore>;

impl Harness {
    fn build(self) -> Service {
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        ContentService::new(ContentServiceDeps {
            content: Arc::new(self.content),
            users: Arc::new(self.users),
            votes: Arc::new(self.votes),
            ledger: ExperienceLedgerService::new(
                Arc::new(self.experience),
                ExperiencePolicy::default(),
                clock.clone(),
            ),
            notifier: Arc::new(self.notifier),
            levels: Arc::new(LevelTable::default()),
            clock,
        })
    }

    fn expect_experience(&mut self, cause: ExperienceCause, change: i32) {
        self.experience
            .expect_append()
            .withf(move |c, _, _| c.cause == cause)
            .times(1)
            .returning(move |c, _, at| {
                Ok(ExperienceReceipt {
                    entry: ExperienceEntry {
                        user: c.user.clone(),
                        change,
                        cause: c.cause,
                        recorded_at: at,
                    },
                    new_total: u32::try_from(change.max(0)).unwrap_or_default(),
                })
            });
    }
}

fn question_by(author: &UserId, status: QuestionStatus) -> Question {
    Question::new(
        author.clone(),
        Title::new("How do I share state between tasks?").expect("valid title"),
        Body::new("Arc or channels?").expect("valid body"),
        status,
        DateTime::<Utc>::UNIX_EPOCH,
    )
}

fn member(id: &UserId, nickname: &str) -> User {
    let mut user = User::register(
        EmailAddress::new(format!("{nickname}@example.com")).expect("valid email"),
        Nickname::new(nickname).expect("valid nickname"),
        PasswordDigest::new("digest"),
        false,
        DateTime::<Utc>::UNIX_EPOCH,
    );
    user.id = id.clone();
    user
}

#[rstest]
#[tokio::test]
async fn creating_a_question_credits_the_author(mut harness: Harness) {
    let author = UserId::random();
    harness
        .content
        .expect_insert_question()
        .times(1)
        .return_once(|_| Ok(()));
    harness.expect_experience(ExperienceCause::Question, 10);

    let question = harness
        .build()
        .create_question(
            &Principal::new(author.clone()),
            NewQuestion {
                title: Title::new("Why Pin?").expect("valid title"),
                body: Body::new("Self-referential futures.").expect("valid body"),
                status: QuestionStatus::Published,
            },
        )
        .await
        .expect("question created");
    assert_eq!(question.author, author);
    assert_eq!(question.counters.score(), 0);
}

#[rstest]
#[tokio::test]
async fn only_the_author_may_edit(mut harness: Harness) {
    let question = question_by(&UserId::random(), QuestionStatus::Published);
    let id = question.id;
    harness
        .content
        .expect_find_question()
        .return_once(move |_| Ok(Some(question)));
    harness.content.expect_update_question().never();

    let err = harness
        .build()
        .update_question(
            &Principal::new(UserId::random()),
            id,
            QuestionEdit {
                body: Some(Body::new("hijacked").expect("valid body")),
                ..QuestionEdit::default()
            },
        )
        .await
        .expect_err("not the author");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn editing_marks_the_question_edited(mut harness: Harness) {
    let author = UserId::random();
    let question = question_by(&author, QuestionStatus::Draft);
    let id = question.id;
    harness
        .content
        .expect_find_question()
        .return_once(move |_| Ok(Some(question)));
    harness
        .content
        .expect_update_question()
        .withf(|q| q.status == QuestionStatus::Published)
        .return_once(|_| Ok(true));

    let updated = harness
        .build()
        .update_question(
            &Principal::new(author),
            id,
            QuestionEdit {
                status: Some(QuestionStatus::Published),
                ..QuestionEdit::default()
            },
        )
        .await
        .expect("edit succeeds");
    assert!(updated.is_edited());
}

#[rstest]
#[tokio::test]
async fn deleting_a_question_debits_the_author(mut harness: Harness) {
    let author = UserId::random();
    let question = question_by(&author, QuestionStatus::Published);
    let id = question.id;
    harness
        .content
        .expect_find_question()
        .return_once(move |_| Ok(Some(question)));
    harness
        .content
        .expect_delete_question()
        .times(1)
        .return_once(|_| Ok(true));
    harness.expect_experience(ExperienceCause::Question, -10);

    harness
        .build()
        .delete_question(&Principal::new(author), id)
        .await
        .expect("delete succeeds");
}

#[rstest]
#[case(true, 0)]
#[case(false, 1)]
#[tokio::test]
async fn answering_notifies_other_authors_only(
    mut harness: Harness,
    #[case] self_answer: bool,
    #[case] notifications: usize,
) {
    let asker = UserId::random();
    let answerer = if self_answer {
        asker.clone()
    } else {
        UserId::random()
    };
    let question = question_by(&asker, QuestionStatus::Published);
    let question_id = question.id;
    harness
        .content
        .expect_find_question()
        .return_once(move |_| Ok(Some(question)));
    harness
        .content
        .expect_insert_answer()
        .return_once(|_| Ok(()));
    harness.expect_experience(ExperienceCause::Answer, 15);
    harness
        .notifier
        .expect_dispatch()
        .withf(move |request| request.recipient == asker)
        .times(notifications)
        .return_const(());

    let answer = harness
        .build()
        .create_answer(
            &Principal::new(answerer),
            NewAnswer {
                question_id,
                body: Body::new("Use Arc<Mutex<_>>.").expect("valid body"),
            },
        )
        .await
        .expect("answer created");
    assert_eq!(answer.question_id, question_id);
}

#[rstest]
#[tokio::test]
async fn drafts_are_hidden_from_other_members(mut harness: Harness) {
    let question = question_by(&UserId::random(), QuestionStatus::Draft);
    let id = question.id;
    harness
        .content
        .expect_find_question()
        .return_once(move |_| Ok(Some(question)));
    harness.content.expect_increment_views().never();

    let err = harness
        .build()
        .question_detail(Some(Principal::new(UserId::random())), id)
        .await
        .expect_err("draft hidden");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn detail_reports_the_viewers_approval(mut harness: Harness) {
    let author = UserId::random();
    let viewer = UserId::random();
    let question = question_by(&author, QuestionStatus::Published);
    let id = question.id;
    let author_row = member(&author, "asker");
    let approval = Vote::new(
        viewer.clone(),
        ContentRef::Question(id),
        VoteType::Approve,
        DateTime::<Utc>::UNIX_EPOCH,
    );

    harness
        .content
        .expect_find_question()
        .return_once(move |_| Ok(Some(question)));
    harness
        .content
        .expect_increment_views()
        .times(1)
        .return_once(|_| Ok(()));
    harness
        .content
        .expect_answers_for()
        .return_once(|_| Ok(Vec::new()));
    harness
        .users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(author_row)));
    harness
        .votes
        .expect_find_vote()
        .return_once(move |_, _| Ok(Some(approval)));

    let detail = harness
        .build()
        .question_detail(Some(Principal::new(viewer)), id)
        .await
        .expect("detail loads");
    assert!(detail.approved_by_viewer);
    assert_eq!(detail.views, 1);
    assert_eq!(detail.author.nickname, "asker");
    assert!(detail.answers.is_empty());
}

#[rstest]
#[tokio::test]
async fn listing_pages_published_questions(mut harness: Harness) {
    let author = UserId::random();
    let questions = vec![
        question_by(&author, QuestionStatus::Published),
        question_by(&author, QuestionStatus::Published),
    ];
    harness
        .content
        .expect_count_published_questions()
        .return_once(|| Ok(12));
    harness
        .content
        .expect_list_published_questions()
        .withf(|sort, offset, limit| {
            *sort == QuestionSort::Popular && *offset == 10 && *limit == 10
        })
        .return_once(move |_, _, _| Ok(questions));

    let page = harness
        .build()
        .list_questions(
            QuestionSort::Popular,
            PageRequest::new(2, 10).expect("valid page"),
        )
        .await
        .expect("listing loads");
    assert_eq!(page.items().len(), 2);
    assert_eq!(page.total_pages(), 2);
    assert!(!page.has_next());
}

#[rstest]
#[tokio::test]
async fn search_passes_the_text_and_page_through(mut harness: Harness) {
    let author = UserId::random();
    let hit = question_by(&author, QuestionStatus::Published);
    harness
        .content
        .expect_count_search_results()
        .withf(|text| text.as_ref() == "tasks")
        .return_once(|_| Ok(1));
    harness
        .content
        .expect_search_published_questions()
        .withf(|text, sort, offset, limit| {
            text.as_ref() == "tasks" && *sort == QuestionSort::Latest && *offset == 0 && *limit == 5
        })
        .return_once(move |_, _, _, _| Ok(vec![hit]));

    let page = harness
        .build()
        .search_questions(
            SearchText::new("  tasks ").expect("valid search"),
            QuestionSort::Latest,
            PageRequest::new(1, 5).expect("valid page"),
        )
        .await
        .expect("search runs");
    assert_eq!(page.items().len(), 1);
    assert_eq!(page.total(), 1);
}

#[rstest]
#[tokio::test]
async fn own_questions_include_drafts_and_answer_counts(mut harness: Harness) {
    let author = UserId::random();
    let draft = question_by(&author, QuestionStatus::Draft);
    let published = question_by(&author, QuestionStatus::Published);
    let answered = published.id;
    harness
        .content
        .expect_author_activity()
        .return_once(|_| {
            Ok(AuthorActivity {
                question_count: 2,
                ..AuthorActivity::default()
            })
        });
    harness
        .content
        .expect_questions_by_author()
        .withf(|_, offset, limit| *offset == 0 && *limit == 10)
        .return_once(move |_, _, _| Ok(vec![draft, published]));
    harness
        .content
        .expect_answer_counts()
        .withf(|ids| ids.len() == 2)
        .return_once(move |_| Ok(HashMap::from([(answered, 3)])));

    let page = harness
        .build()
        .questions_by(
            &Principal::new(author),
            PageRequest::new(1, 10).expect("valid page"),
        )
        .await
        .expect("own questions load");
    let rows: Vec<(QuestionStatus, u32)> = page
        .items()
        .iter()
        .map(|row| (row.status, row.answer_count))
        .collect();
    assert_eq!(
        rows,
        vec![(QuestionStatus::Draft, 0), (QuestionStatus::Published, 3)]
    );
    assert_eq!(page.total(), 2);
}

#[rstest]
#[tokio::test]
async fn own_answers_are_totalled_from_activity(mut harness: Harness) {
    let author = UserId::random();
    let answer = Answer::new(
        QuestionId::random(),
        author.clone(),
        Body::new("Use a channel.").expect("valid body"),
        DateTime::<Utc>::UNIX_EPOCH,
    );
    harness
        .content
        .expect_author_activity()
        .return_once(|_| {
            Ok(AuthorActivity {
                answer_count: 11,
                ..AuthorActivity::default()
            })
        });
    harness
        .content
        .expect_answers_by_author()
        .withf(|_, offset, limit| *offset == 10 && *limit == 10)
        .return_once(move |_, _, _| Ok(vec![answer]));

    let page = harness
        .build()
        .answers_by(
            &Principal::new(author),
            PageRequest::new(2, 10).expect("valid page"),
        )
        .await
        .expect("own answers load");
    assert_eq!(page.items().len(), 1);
    assert_eq!(page.items()[0].excerpt, "Use a channel.");
    assert_eq!(page.total(), 11);
}
