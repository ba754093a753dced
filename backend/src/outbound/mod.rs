//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: mutex-guarded store used when no database is configured
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **notifications**: background dispatcher writing member notifications
//! - **password**: Argon2id password hashing
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod notifications;
pub mod password;
pub mod persistence;
