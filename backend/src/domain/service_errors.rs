//! Translation of driven-port failures into API errors.
//!
//! Only variants with a meaning for callers are listed here; the shared
//! connection and query failures go through each error's `into_api_error`.

use serde_json::json;

use super::Error;
use super::ports::{
    ContentPersistenceError, ExperienceStoreError, PasswordHashingError, UserPersistenceError,
    VoteStoreError,
};

/// Conflict raised when the voter already holds the vote being cast.
pub fn duplicate_vote() -> Error {
    Error::conflict("you have already cast this vote").with_details(json!({
        "code": "duplicate_vote",
    }))
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail => Error::conflict("email is already registered")
            .with_details(json!({ "field": "email", "code": "duplicate_email" })),
        UserPersistenceError::DuplicateNickname => Error::conflict("nickname is already taken")
            .with_details(json!({ "field": "nickname", "code": "duplicate_nickname" })),
        other => other.into_api_error(),
    }
}

pub(crate) fn map_content_error(error: ContentPersistenceError) -> Error {
    match error {
        ContentPersistenceError::QuestionMissing => Error::not_found("question not found"),
        other => other.into_api_error(),
    }
}

pub(crate) fn map_vote_error(error: VoteStoreError) -> Error {
    match error {
        VoteStoreError::DuplicateVote => duplicate_vote(),
        VoteStoreError::VoteMissing => {
            Error::conflict("the vote changed concurrently; retry the request")
        }
        VoteStoreError::ContentMissing => Error::not_found("content not found"),
        VoteStoreError::UserMissing => Error::internal("content owner is missing"),
        other => other.into_api_error(),
    }
}

pub(crate) fn map_experience_error(error: ExperienceStoreError) -> Error {
    match error {
        ExperienceStoreError::UserMissing => Error::not_found("user not found"),
        other => other.into_api_error(),
    }
}

/// Rejection for a password change whose current password does not verify.
pub(crate) fn incorrect_password() -> Error {
    Error::invalid_request("current password is incorrect").with_details(json!({
        "field": "currentPassword",
        "code": "incorrect_password",
    }))
}

pub(crate) fn map_hashing_error(error: PasswordHashingError) -> Error {
    Error::internal(error.to_string())
}
