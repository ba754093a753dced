//! Tests for question handlers.

use super::*;
use crate::domain::{
    AuthorSummary, EmailAddress, LevelTable, Nickname, PasswordDigest, User, VoteCounters,
};
use crate::inbound::http::test_utils::{MockPorts, read_json, session_cookie, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::TimeZone;
use pagination::Paginated;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const AUTHOR: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
const OTHER: &str = "9b2d4c1e-7a3f-4e5d-8c6b-1a2b3c4d5e6f";

#[fixture]
fn question() -> Question {
    let at = Utc
        .with_ymd_and_hms(2026, 2, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let mut question = Question::new(
        UserId::new(AUTHOR).expect("fixture id"),
        Title::new("How do lifetimes work?").expect("valid title"),
        Body::new("Asking for a friend.").expect("valid body"),
        QuestionStatus::Published,
        at,
    );
    question.counters = VoteCounters {
        approve_count: 3,
        reject_count: 1,
    };
    question
}

fn author_summary() -> AuthorSummary {
    let mut user = User::register(
        EmailAddress::new("ada@example.com").expect("valid email"),
        Nickname::new("ada").expect("valid nickname"),
        PasswordDigest::new("digest"),
        false,
        Utc::now(),
    );
    user.id = UserId::new(AUTHOR).expect("fixture id");
    AuthorSummary::new(&user, &LevelTable::default())
}

fn app_with(
    ports: MockPorts,
) -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    test_app(ports).service(
        web::scope("/api/v1")
            .service(list_questions)
            .service(search_questions)
            .service(create_question)
            .service(get_question)
            .service(update_question)
            .service(delete_question),
    )
}

#[rstest]
#[actix_web::test]
async fn listing_defaults_to_latest_first_page(question: Question) {
    let mut ports = MockPorts::default();
    ports
        .content_query
        .expect_list_questions()
        .withf(|sort, page| *sort == QuestionSort::Latest && page.page() == 1)
        .times(1)
        .returning(move |_, page| {
            Ok(Paginated::new(vec![QuestionSummary::from(&question)], page, 1))
        });
    let app = actix_test::init_service(app_with(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/questions")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body.pointer("/items/0/score").and_then(Value::as_i64), Some(2));
    assert_eq!(body.get("total").and_then(Value::as_u64), Some(1));
}

#[rstest]
#[actix_web::test]
async fn listing_accepts_popular_sort() {
    let mut ports = MockPorts::default();
    ports
        .content_query
        .expect_list_questions()
        .withf(|sort, page| *sort == QuestionSort::Popular && page.limit() == 5)
        .times(1)
        .returning(|_, page| Ok(Paginated::new(Vec::new(), page, 0)));
    let app = actix_test::init_service(app_with(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/questions?sort=popular&limit=5")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn create_requires_login() {
    let app = actix_test::init_service(app_with(MockPorts::default())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/questions")
            .set_json(json!({"title": "t", "body": "b"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn create_returns_the_stored_question(question: Question) {
    let mut ports = MockPorts::default();
    ports
        .content
        .expect_create_question()
        .withf(|principal, new| {
            principal.user_id().as_ref() == AUTHOR
                && new.title.as_ref() == "How do lifetimes work?"
                && new.status == QuestionStatus::Draft
        })
        .times(1)
        .returning(move |_, _| Ok(question.clone()));
    let app = actix_test::init_service(app_with(ports)).await;
    let cookie = session_cookie(&app, AUTHOR).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/questions")
            .cookie(cookie)
            .set_json(json!({
                "title": "How do lifetimes work?",
                "body": "Asking for a friend.",
                "status": "draft"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    assert_eq!(body.get("authorId").and_then(Value::as_str), Some(AUTHOR));
}

#[rstest]
#[actix_web::test]
async fn blank_title_is_rejected_before_the_service() {
    let app = actix_test::init_service(app_with(MockPorts::default())).await;
    let cookie = session_cookie(&app, AUTHOR).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/questions")
            .cookie(cookie)
            .set_json(json!({"title": "   ", "body": "text"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(
        body.pointer("/details/field").and_then(Value::as_str),
        Some("title")
    );
}

#[rstest]
#[actix_web::test]
async fn detail_passes_the_viewer_through(question: Question) {
    let mut ports = MockPorts::default();
    let id = question.id;
    ports
        .content_query
        .expect_question_detail()
        .withf(move |viewer, requested| {
            *requested == id
                && viewer
                    .as_ref()
                    .is_some_and(|principal| principal.user_id().as_ref() == OTHER)
        })
        .times(1)
        .returning(move |_, _| {
            Ok(QuestionDetail::new(&question, author_summary(), true, Vec::new()))
        });
    let app = actix_test::init_service(app_with(ports)).await;
    let cookie = session_cookie(&app, OTHER).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/questions/{id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body.get("approvedByViewer").and_then(Value::as_bool), Some(true));
    assert_eq!(
        body.pointer("/author/nickname").and_then(Value::as_str),
        Some("ada")
    );
}

#[rstest]
#[actix_web::test]
async fn anonymous_detail_has_no_viewer(question: Question) {
    let mut ports = MockPorts::default();
    let id = question.id;
    ports
        .content_query
        .expect_question_detail()
        .withf(|viewer, _| viewer.is_none())
        .returning(move |_, _| {
            Ok(QuestionDetail::new(&question, author_summary(), false, Vec::new()))
        });
    let app = actix_test::init_service(app_with(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/questions/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn empty_edit_is_rejected(question: Question) {
    let app = actix_test::init_service(app_with(MockPorts::default())).await;
    let cookie = session_cookie(&app, AUTHOR).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/questions/{}", question.id))
            .cookie(cookie)
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn editing_someone_elses_question_is_forbidden(question: Question) {
    let mut ports = MockPorts::default();
    ports
        .content
        .expect_update_question()
        .returning(|_, _, _| Err(Error::forbidden("only the author may edit this question")));
    let app = actix_test::init_service(app_with(ports)).await;
    let cookie = session_cookie(&app, OTHER).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/questions/{}", question.id))
            .cookie(cookie)
            .set_json(json!({"body": "rewritten"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn delete_returns_no_content(question: Question) {
    let mut ports = MockPorts::default();
    let id = question.id;
    ports
        .content
        .expect_delete_question()
        .withf(move |_, requested| *requested == id)
        .times(1)
        .returning(|_, _| Ok(()));
    let app = actix_test::init_service(app_with(ports)).await;
    let cookie = session_cookie(&app, AUTHOR).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/questions/{id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[rstest]
#[actix_web::test]
async fn malformed_question_id_is_a_bad_request() {
    let app = actix_test::init_service(app_with(MockPorts::default())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/questions/42")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn search_is_not_mistaken_for_a_question_id(question: Question) {
    let mut ports = MockPorts::default();
    ports
        .content_query
        .expect_search_questions()
        .withf(|text, sort, page| {
            text.as_ref() == "Lifetimes" && *sort == QuestionSort::Popular && page.page() == 1
        })
        .times(1)
        .returning(move |_, _, page| {
            Ok(Paginated::new(vec![QuestionSummary::from(&question)], page, 1))
        });
    ports.content_query.expect_question_detail().never();
    let app = actix_test::init_service(app_with(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/questions/search?q=%20Lifetimes%20&sort=popular")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(
        body.pointer("/items/0/title").and_then(Value::as_str),
        Some("How do lifetimes work?")
    );
}

#[rstest]
#[case("/api/v1/questions/search")]
#[case("/api/v1/questions/search?q=%20%20")]
#[actix_web::test]
async fn search_requires_text(#[case] uri: &str) {
    let mut ports = MockPorts::default();
    ports.content_query.expect_search_questions().never();
    let app = actix_test::init_service(app_with(ports)).await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body.pointer("/details/field").and_then(Value::as_str), Some("q"));
    assert_eq!(
        body.pointer("/details/code").and_then(Value::as_str),
        Some("empty_value")
    );
}
