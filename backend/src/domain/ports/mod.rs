//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, `*Store`, dispatch, hashing) are implemented
//! by outbound adapters. Driving ports (`*Command`, `*Query`, the inbox) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod announcement_query;
mod announcement_repository;
mod content_command;
mod content_query;
mod content_repository;
mod experience_query;
mod experience_store;
mod notification_dispatcher;
mod notification_inbox;
mod notification_repository;
mod password_hashing;
mod ranking_query;
mod user_repository;
mod vote_command;
mod vote_store;

pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use announcement_query::AnnouncementQuery;
#[cfg(test)]
pub use announcement_query::MockAnnouncementQuery;
#[cfg(test)]
pub use announcement_repository::MockAnnouncementRepository;
pub use announcement_repository::{AnnouncementPersistenceError, AnnouncementRepository};
#[cfg(test)]
pub use content_command::MockContentCommand;
pub use content_command::{ContentCommand, NewAnswer, NewQuestion, QuestionEdit};
pub use content_query::ContentQuery;
#[cfg(test)]
pub use content_query::MockContentQuery;
#[cfg(test)]
pub use content_repository::MockContentRepository;
pub use content_repository::{ContentPersistenceError, ContentRepository, QuestionSort};
pub use experience_query::ExperienceQuery;
#[cfg(test)]
pub use experience_query::MockExperienceQuery;
#[cfg(test)]
pub use experience_store::MockExperienceStore;
pub use experience_store::{ExperienceStore, ExperienceStoreError};
#[cfg(test)]
pub use notification_dispatcher::MockNotificationDispatcher;
pub use notification_dispatcher::{NoOpNotificationDispatcher, NotificationDispatcher};
#[cfg(test)]
pub use notification_inbox::MockNotificationInbox;
pub use notification_inbox::NotificationInbox;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationPersistenceError, NotificationRepository};
#[cfg(test)]
pub use password_hashing::MockPasswordHashing;
pub use password_hashing::{PasswordHashing, PasswordHashingError};
#[cfg(test)]
pub use ranking_query::MockRankingQuery;
pub use ranking_query::RankingQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use vote_command::MockVoteCommand;
pub use vote_command::{VoteCommand, VoteRequest};
#[cfg(test)]
pub use vote_store::MockVoteStore;
pub use vote_store::{VoteChange, VoteReceipt, VoteStore, VoteStoreError};
