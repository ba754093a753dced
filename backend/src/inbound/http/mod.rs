//! HTTP inbound adapter exposing the community REST endpoints.
//!
//! Handlers depend only on the driving ports bundled in [`state::HttpState`].
//! Authentication rides on a cookie session; see [`session`].

pub mod accounts;
pub mod announcements;
pub mod answers;
pub mod error;
pub mod health;
pub mod notifications;
pub mod questions;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod votes;

pub use error::ApiResult;

use actix_web::web;

use crate::domain::Error;

/// Register every `/api/v1` endpoint on `cfg`.
///
/// Callers wrap the enclosing scope with the session middleware and supply
/// [`state::HttpState`] as app data. Malformed JSON bodies and query strings
/// are answered with the usual error body rather than Actix's plain text.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed JSON body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed query string: {err}")).into()
    }))
    .service(accounts::register)
    .service(accounts::login)
    .service(accounts::logout)
    .service(accounts::get_profile)
    .service(accounts::update_profile)
    .service(accounts::change_password)
    .service(users::dashboard)
    .service(users::experience_history)
    .service(users::my_questions)
    .service(users::my_answers)
    .service(users::rankings)
    .service(users::top_rankings)
    .service(users::rank)
    .service(questions::list_questions)
    .service(questions::search_questions)
    .service(questions::create_question)
    .service(questions::get_question)
    .service(questions::update_question)
    .service(questions::delete_question)
    .service(votes::vote_on_question)
    .service(answers::create_answer)
    .service(answers::update_answer)
    .service(answers::delete_answer)
    .service(votes::vote_on_answer)
    .service(notifications::list_notifications)
    .service(notifications::mark_notification_read)
    .service(announcements::list_announcements)
    .service(announcements::get_announcement)
    .service(announcements::record_announcement_view);
}
