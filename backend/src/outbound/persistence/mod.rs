//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain's storage ports backed by
//! PostgreSQL through `diesel-async` and a shared `bb8` pool.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and domain
//!   types. The business rules live in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Atomic ledger writes**: vote changes and experience appends each run
//!   in one transaction that locks the rows they modify.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/community")).await?;
//! let users = DieselUserRepository::new(pool.clone());
//! ```

mod diesel_announcement_repository;
mod diesel_content_repository;
mod diesel_experience_store;
mod diesel_helpers;
mod diesel_notification_repository;
mod diesel_user_repository;
mod diesel_vote_store;
mod models;
mod pool;
mod schema;

pub use diesel_announcement_repository::DieselAnnouncementRepository;
pub use diesel_content_repository::DieselContentRepository;
pub use diesel_experience_store::DieselExperienceStore;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_vote_store::DieselVoteStore;
pub use pool::{DbPool, PoolConfig, PoolError};
