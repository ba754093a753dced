//! Tests for member standing handlers.

use super::*;
use crate::domain::{
    Answer, AuthorActivity, Body, EmailAddress, ExperienceCause, LevelTable, Nickname,
    PasswordDigest, Question, QuestionId, QuestionStatus, Standing, Title, User,
};
use crate::inbound::http::test_utils::{MockPorts, read_json, session_cookie, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pagination::Paginated;
use rstest::{fixture, rstest};
use serde_json::Value;

const MEMBER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn ada(now: DateTime<Utc>, total_experience: u32) -> User {
    let mut user = User::register(
        EmailAddress::new("ada@example.com").expect("valid email"),
        Nickname::new("ada").expect("valid nickname"),
        PasswordDigest::new("digest"),
        true,
        now - Duration::days(30),
    );
    user.id = UserId::new(MEMBER).expect("fixture id");
    user.total_experience = total_experience;
    user
}

fn entry(change: i32, cause: ExperienceCause, at: DateTime<Utc>) -> ExperienceEntry {
    ExperienceEntry {
        user: UserId::new(MEMBER).expect("fixture id"),
        change,
        cause,
        recorded_at: at,
    }
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
            .service(dashboard)
            .service(experience_history)
            .service(my_questions)
            .service(my_answers)
            .service(rankings)
            .service(top_rankings)
            .service(rank),
    )
}

#[rstest]
#[actix_web::test]
async fn dashboard_requires_login() {
    let app = actix_test::init_service(app_with(MockPorts::default())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me/dashboard")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn dashboard_reports_standing_and_level(now: DateTime<Utc>) {
    let mut ports = MockPorts::default();
    ports
        .rankings
        .expect_dashboard()
        .withf(|user| user.as_ref() == MEMBER)
        .times(1)
        .returning(move |_| {
            Ok(Dashboard::new(
                &ada(now, 120),
                &LevelTable::default(),
                Standing::new(1, Some(3), 8),
                AuthorActivity {
                    question_count: 2,
                    answer_count: 5,
                    approvals_received: 4,
                },
                now,
            ))
        });
    let app = actix_test::init_service(app_with(ports)).await;
    let cookie = session_cookie(&app, MEMBER).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me/dashboard")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body.pointer("/standing/rank").and_then(Value::as_u64), Some(1));
    assert_eq!(
        body.pointer("/standing/rankChange").and_then(Value::as_i64),
        Some(2)
    );
    assert_eq!(
        body.pointer("/standing/topPercentage").and_then(Value::as_str),
        Some("12.50")
    );
    assert_eq!(body.pointer("/level/number").and_then(Value::as_u64), Some(2));
    assert_eq!(
        body.get("experienceToNextLevel").and_then(Value::as_u64),
        Some(180)
    );
    assert_eq!(
        body.pointer("/activity/approvalsReceived")
            .and_then(Value::as_u64),
        Some(4)
    );
}

#[rstest]
#[actix_web::test]
async fn experience_history_replays_to_total(now: DateTime<Utc>) {
    let mut ports = MockPorts::default();
    ports.experience.expect_history().returning(move |_| {
        Ok(vec![
            entry(5, ExperienceCause::Question, now),
            entry(-20, ExperienceCause::ApproveVote, now),
            entry(15, ExperienceCause::Answer, now),
        ])
    });
    let app = actix_test::init_service(app_with(ports)).await;
    let cookie = session_cookie(&app, MEMBER).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me/experience")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body.get("total").and_then(Value::as_u64), Some(15));
    assert_eq!(
        body.pointer("/entries/1/cause").and_then(Value::as_str),
        Some("APPROVE_VOTE")
    );
}

#[rstest]
#[actix_web::test]
async fn rankings_page_carries_totals(now: DateTime<Utc>) {
    let mut ports = MockPorts::default();
    ports
        .rankings
        .expect_rankings()
        .withf(|page| page.page() == 2 && page.limit() == 1)
        .returning(move |page| {
            let entry = RankingEntry::new(2, &ada(now, 40), &LevelTable::default(), now);
            Ok(Paginated::new(vec![entry], page, 3))
        });
    let app = actix_test::init_service(app_with(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/rankings?page=2&limit=1")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body.get("total").and_then(Value::as_u64), Some(3));
    assert_eq!(body.get("totalPages").and_then(Value::as_u64), Some(3));
    assert_eq!(body.pointer("/items/0/rank").and_then(Value::as_u64), Some(2));
    assert_eq!(
        body.pointer("/items/0/daysSinceJoined")
            .and_then(Value::as_i64),
        Some(30)
    );
}

#[rstest]
#[actix_web::test]
async fn rankings_reject_zero_limit() {
    let app = actix_test::init_service(app_with(MockPorts::default())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/rankings?limit=0")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn rank_of_unknown_member_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .rankings
        .expect_rank()
        .returning(|_| Err(Error::not_found("member not found")));
    let app = actix_test::init_service(app_with(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/users/{MEMBER}/rank"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn rank_is_returned_for_known_member() {
    let mut ports = MockPorts::default();
    ports.rankings.expect_rank().returning(|_| Ok(4));
    let app = actix_test::init_service(app_with(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/users/{MEMBER}/rank"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body.get("rank").and_then(Value::as_u64), Some(4));
    assert_eq!(body.get("userId").and_then(Value::as_str), Some(MEMBER));
}

#[rstest]
#[actix_web::test]
async fn malformed_member_id_is_a_bad_request() {
    let app = actix_test::init_service(app_with(MockPorts::default())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/not-a-uuid/rank")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[case("/api/v1/users/me/questions")]
#[case("/api/v1/users/me/answers")]
#[actix_web::test]
async fn own_content_requires_login(#[case] uri: &str) {
    let app = actix_test::init_service(app_with(MockPorts::default())).await;
    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn own_questions_show_drafts(now: DateTime<Utc>) {
    let mut ports = MockPorts::default();
    ports
        .content_query
        .expect_questions_by()
        .withf(|principal, page| principal.user_id().to_string() == MEMBER && page.limit() == 5)
        .times(1)
        .returning(move |principal, page| {
            let draft = Question::new(
                principal.user_id().clone(),
                Title::new("Half-written").expect("valid title"),
                Body::new("Still thinking").expect("valid body"),
                QuestionStatus::Draft,
                now,
            );
            Ok(Paginated::new(vec![AuthoredQuestion::new(&draft, 0)], page, 1))
        });
    let app = actix_test::init_service(app_with(ports)).await;
    let cookie = session_cookie(&app, MEMBER).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me/questions?limit=5")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(
        body.pointer("/items/0/status").and_then(Value::as_str),
        Some("draft")
    );
    assert_eq!(
        body.pointer("/items/0/excerpt").and_then(Value::as_str),
        Some("Still thinking")
    );
}

#[rstest]
#[actix_web::test]
async fn own_answers_link_back_to_their_question(now: DateTime<Utc>) {
    let question_id = QuestionId::random();
    let mut ports = MockPorts::default();
    ports
        .content_query
        .expect_answers_by()
        .times(1)
        .returning(move |principal, page| {
            let answer = Answer::new(
                question_id,
                principal.user_id().clone(),
                Body::new("Use scoped threads.").expect("valid body"),
                now,
            );
            Ok(Paginated::new(vec![AuthoredAnswer::from(&answer)], page, 1))
        });
    let app = actix_test::init_service(app_with(ports)).await;
    let cookie = session_cookie(&app, MEMBER).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me/answers")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    let expected = question_id.to_string();
    assert_eq!(
        body.pointer("/items/0/questionId").and_then(Value::as_str),
        Some(expected.as_str())
    );
}

#[rstest]
#[actix_web::test]
async fn podium_is_public_and_not_a_member_rank(now: DateTime<Utc>) {
    let mut ports = MockPorts::default();
    ports.rankings.expect_rank().never();
    ports.rankings.expect_top().times(1).returning(move || {
        Ok(vec![RankingEntry::new(1, &ada(now, 900), &LevelTable::default(), now)])
    });
    let app = actix_test::init_service(app_with(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/rankings/top")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body.pointer("/0/rank").and_then(Value::as_u64), Some(1));
    assert_eq!(body.pointer("/0/nickname").and_then(Value::as_str), Some("ada"));
}
