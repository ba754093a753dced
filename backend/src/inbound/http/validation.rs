//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is an `invalid_request` error whose `details` name the
//! offending field and a stable machine-readable code.

use std::str::FromStr;

use pagination::{PageParams, PageRequest, PageRequestError};
use serde_json::json;

use crate::domain::{
    ContentValidationError, CredentialsValidationError, Error, InvalidVoteValue,
    PasswordChangeValidationError, UserValidationError, VoteValue,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidValue,
    EmptyValue,
    TooLong,
    TooShort,
    EmptyEdit,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::EmptyValue => "empty_value",
            ErrorCode::TooLong => "too_long",
            ErrorCode::TooShort => "too_short",
            ErrorCode::EmptyEdit => "empty_edit",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

/// Parse a UUID-backed identifier taken from the path or body.
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr,
{
    value.parse().map_err(|_| {
        let name = field.as_str();
        Error::invalid_request(format!("{name} must be a valid UUID")).with_details(json!({
            "field": name,
            "value": value,
            "code": ErrorCode::InvalidUuid.as_str(),
        }))
    })
}

pub(crate) fn content_error(error: ContentValidationError) -> Error {
    let (field, code) = match error {
        ContentValidationError::EmptyTitle => ("title", ErrorCode::EmptyValue),
        ContentValidationError::TitleTooLong { .. } => ("title", ErrorCode::TooLong),
        ContentValidationError::EmptyBody => ("body", ErrorCode::EmptyValue),
        ContentValidationError::BodyTooLong { .. } => ("body", ErrorCode::TooLong),
        ContentValidationError::EmptySearch => ("q", ErrorCode::EmptyValue),
        ContentValidationError::SearchTooLong { .. } => ("q", ErrorCode::TooLong),
    };
    field_error(FieldName::new(field), code, error.to_string())
}

pub(crate) fn credentials_error(error: CredentialsValidationError) -> Error {
    let (field, code) = match &error {
        CredentialsValidationError::Email(_) => ("email", ErrorCode::InvalidValue),
        CredentialsValidationError::EmptyPassword => ("password", ErrorCode::EmptyValue),
        CredentialsValidationError::PasswordTooShort { .. } => ("password", ErrorCode::TooShort),
    };
    field_error(FieldName::new(field), code, error.to_string())
}

pub(crate) fn password_change_error(error: PasswordChangeValidationError) -> Error {
    let (field, code) = match error {
        PasswordChangeValidationError::EmptyCurrent => ("currentPassword", ErrorCode::EmptyValue),
        PasswordChangeValidationError::TooShort { .. } => ("newPassword", ErrorCode::TooShort),
        PasswordChangeValidationError::Unchanged => ("newPassword", ErrorCode::InvalidValue),
    };
    field_error(FieldName::new(field), code, error.to_string())
}

pub(crate) fn nickname_error(error: UserValidationError) -> Error {
    field_error(
        FieldName::new("nickname"),
        ErrorCode::InvalidValue,
        error.to_string(),
    )
}

pub(crate) fn empty_edit_error() -> Error {
    field_error(
        FieldName::new("body"),
        ErrorCode::EmptyEdit,
        "request must change at least one field",
    )
}

pub(crate) fn vote_value(raw: i64) -> Result<VoteValue, Error> {
    VoteValue::try_from(raw).map_err(|error: InvalidVoteValue| {
        field_error(
            FieldName::new("value"),
            ErrorCode::InvalidValue,
            error.to_string(),
        )
    })
}

pub(crate) fn page_request(params: PageParams) -> Result<PageRequest, Error> {
    PageRequest::try_from(params).map_err(|error| {
        let field = match error {
            PageRequestError::ZeroPage => "page",
            PageRequestError::ZeroLimit | PageRequestError::LimitTooLarge { .. } => "limit",
        };
        field_error(FieldName::new(field), ErrorCode::InvalidValue, error.to_string())
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::QuestionId;
    use rstest::rstest;
    use serde_json::Value;

    fn detail(error: &Error, key: &str) -> Option<String> {
        error
            .details()
            .and_then(|details| details.get(key))
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    #[rstest]
    fn parse_id_reports_field_and_value() {
        let error = parse_id::<QuestionId>("nope", FieldName::new("questionId"))
            .expect_err("invalid uuid");
        assert_eq!(error.message(), "questionId must be a valid UUID");
        assert_eq!(detail(&error, "value").as_deref(), Some("nope"));
        assert_eq!(detail(&error, "code").as_deref(), Some("invalid_uuid"));
    }

    #[rstest]
    #[case(ContentValidationError::EmptyTitle, "title", "empty_value")]
    #[case(ContentValidationError::TitleTooLong { max: 200 }, "title", "too_long")]
    #[case(ContentValidationError::EmptyBody, "body", "empty_value")]
    #[case(ContentValidationError::EmptySearch, "q", "empty_value")]
    #[case(ContentValidationError::SearchTooLong { max: 100 }, "q", "too_long")]
    fn content_errors_name_their_field(
        #[case] error: ContentValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mapped = content_error(error);
        assert_eq!(detail(&mapped, "field").as_deref(), Some(field));
        assert_eq!(detail(&mapped, "code").as_deref(), Some(code));
    }

    #[rstest]
    #[case(PasswordChangeValidationError::EmptyCurrent, "currentPassword", "empty_value")]
    #[case(PasswordChangeValidationError::TooShort { min: 8 }, "newPassword", "too_short")]
    #[case(PasswordChangeValidationError::Unchanged, "newPassword", "invalid_value")]
    fn password_change_errors_name_their_field(
        #[case] error: PasswordChangeValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mapped = password_change_error(error);
        assert_eq!(detail(&mapped, "field").as_deref(), Some(field));
        assert_eq!(detail(&mapped, "code").as_deref(), Some(code));
    }

    #[rstest]
    #[case(2)]
    #[case(-2)]
    fn out_of_range_vote_values_are_rejected(#[case] raw: i64) {
        let error = vote_value(raw).expect_err("out of range");
        assert_eq!(detail(&error, "field").as_deref(), Some("value"));
    }

    #[rstest]
    fn oversized_pages_point_at_the_limit() {
        let error = page_request(PageParams {
            page: Some(1),
            limit: Some(1_000),
        })
        .expect_err("limit too large");
        assert_eq!(detail(&error, "field").as_deref(), Some("limit"));
    }

    #[rstest]
    fn missing_page_params_use_defaults() {
        let request = page_request(PageParams::default()).expect("defaults are valid");
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), pagination::DEFAULT_LIMIT);
    }
}
