//! Shared helpers for Diesel repository implementations.
//!
//! - Error mapping from pool and Diesel errors to port errors
//! - Transaction error plumbing for adapters that abort with a port error
//! - Lossless conversions between database integers and domain counters

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{
    AnnouncementPersistenceError, ContentPersistenceError, ExperienceStoreError,
    NotificationPersistenceError, UserPersistenceError, VoteStoreError,
};

use super::pool::PoolError;

/// Port errors with connection and query variants.
pub(crate) trait PersistenceFailure: Sized {
    fn connection_failure(message: String) -> Self;
    fn query_failure(message: String) -> Self;
}

macro_rules! persistence_failure {
    ($($error:ty),* $(,)?) => {
        $(
            impl PersistenceFailure for $error {
                fn connection_failure(message: String) -> Self {
                    Self::connection(message)
                }

                fn query_failure(message: String) -> Self {
                    Self::query(message)
                }
            }
        )*
    };
}

persistence_failure!(
    UserPersistenceError,
    ContentPersistenceError,
    VoteStoreError,
    ExperienceStoreError,
    NotificationPersistenceError,
    AnnouncementPersistenceError,
);

/// Map pool errors to the port's connection variant.
pub(crate) fn map_pool_error<E: PersistenceFailure>(error: PoolError) -> E {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            E::connection_failure(message)
        }
    }
}

/// Map Diesel errors to the port's connection or query variant.
///
/// Messages stay generic; the database detail is logged at debug level.
pub(crate) fn map_diesel_error<E: PersistenceFailure>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => E::query_failure("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query_failure("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection_failure("database connection error".to_owned())
        }
        _ => E::query_failure("database error".to_owned()),
    }
}

/// Name of the unique constraint a Diesel error violated, if any.
pub(crate) fn unique_violation(error: &DieselError) -> Option<&str> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(info.constraint_name().unwrap_or_default())
        }
        _ => None,
    }
}

/// Error type for transactions that can abort with a port error.
///
/// Diesel rolls back when the closure returns `Err`; the port error is then
/// surfaced unchanged.
#[derive(Debug)]
pub(crate) enum TxError<E> {
    Diesel(DieselError),
    Abort(E),
}

impl<E> From<DieselError> for TxError<E> {
    fn from(value: DieselError) -> Self {
        Self::Diesel(value)
    }
}

impl<E: PersistenceFailure> TxError<E> {
    pub(crate) fn into_port_error(self) -> E {
        match self {
            Self::Diesel(error) => map_diesel_error(error),
            Self::Abort(error) => error,
        }
    }
}

/// Read a non-negative database integer as a domain counter.
pub(crate) fn to_u32(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

/// Write a domain counter to an `INTEGER` column, saturating at `i32::MAX`.
pub(crate) fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Convert a count or offset to `i64` for `LIMIT`/`OFFSET` and back.
pub(crate) fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub(crate) fn to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

/// `ILIKE` pattern matching `text` anywhere, with its wildcards escaped.
pub(crate) fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
