//! Community Q&A backend.
//!
//! Members ask questions, answer them, and vote on each other's content.
//! Votes move content counters and the owner's experience; experience sets
//! a member's level and rank.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
