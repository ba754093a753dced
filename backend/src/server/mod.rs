//! Server construction and middleware wiring.
//!
//! The API lives under `/api/v1` behind a private cookie session; health
//! checks and, in debug builds, Swagger UI sit outside it. Every route runs
//! inside the [`Trace`] middleware.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::{Storage, build_http_state};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::api_routes;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// Cookie attributes shared by every worker.
#[derive(Clone)]
struct SessionCookie {
    key: Key,
    secure: bool,
    same_site: SameSite,
}

impl SessionCookie {
    fn middleware(self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key)
            .cookie_name(SESSION_COOKIE.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cookie: SessionCookie,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .wrap(cookie.middleware())
        .configure(api_routes);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the community server and mark the readiness check as ready.
///
/// Handler state is built once and shared by every worker, so the in-memory
/// store (used when no pool is configured) is one community, not one per
/// worker thread.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let storage = Storage::from_config(&config);
    let http_state = build_http_state(&config);
    let ServerConfig {
        session, bind_addr, ..
    } = config;
    let cookie = SessionCookie {
        key: session.key,
        secure: session.cookie_secure,
        same_site: session.same_site,
    };

    let worker_health = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(worker_health.clone(), http_state.clone(), cookie.clone())
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, storage = storage.as_str(), "community server listening");
    health_state.mark_ready();
    Ok(server)
}
