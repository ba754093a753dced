//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::ports::{
    MockAccountCommand, MockAnnouncementQuery, MockContentCommand, MockContentQuery,
    MockExperienceQuery, MockNotificationInbox, MockRankingQuery, MockVoteCommand,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const TEST_LOGIN_PATH: &str = "/__test/login/{id}";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

async fn test_login(
    path: web::Path<String>,
    session: SessionContext,
) -> Result<HttpResponse, Error> {
    let id = UserId::new(path.into_inner())
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    session.persist_user(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mount a route that signs in whichever member id it is given.
pub fn with_test_login<T>(app: App<T>) -> App<T>
where
    T: ServiceFactory<ServiceRequest, Config = (), Error = actix_web::Error, InitError = ()>,
{
    app.route(TEST_LOGIN_PATH, web::post().to(test_login))
}

/// Sign in as `user_id` through the test login route and return the cookie.
pub async fn session_cookie<S>(app: &S, user_id: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/__test/login/{user_id}"))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "test login failed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Mocked driving ports; tests set expectations on the ones they exercise.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountCommand,
    pub content: MockContentCommand,
    pub content_query: MockContentQuery,
    pub votes: MockVoteCommand,
    pub rankings: MockRankingQuery,
    pub experience: MockExperienceQuery,
    pub notifications: MockNotificationInbox,
    pub announcements: MockAnnouncementQuery,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            accounts: Arc::new(self.accounts),
            content: Arc::new(self.content),
            content_query: Arc::new(self.content_query),
            votes: Arc::new(self.votes),
            rankings: Arc::new(self.rankings),
            experience: Arc::new(self.experience),
            notifications: Arc::new(self.notifications),
            announcements: Arc::new(self.announcements),
        })
    }
}

/// App with mocked state, a test session, and the test login route.
pub fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    with_test_login(
        App::new()
            .app_data(ports.into_state())
            .wrap(test_session_middleware()),
    )
}

/// Read a JSON response body.
pub async fn read_json(res: ServiceResponse) -> serde_json::Value {
    let body = test::read_body(res).await;
    serde_json::from_slice(&body).expect("response JSON")
}
