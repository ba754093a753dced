//! Authentication primitives: credentials, registrations, and the principal.
//!
//! Inbound adapters build these from raw payloads so services only ever see
//! validated input.

use zeroize::Zeroizing;

use super::{EmailAddress, UserId, UserValidationError};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when an authentication payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// The email was missing or malformed.
    #[error(transparent)]
    Email(#[from] UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password is shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

/// Validated login credentials.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "password").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    ///
    /// The password keeps caller-provided whitespace so comparisons are exact.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: EmailAddress,
    password: Zeroizing<String>,
    email_consent: bool,
}

impl Registration {
    /// Validate a sign-up payload.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        email_consent: bool,
    ) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            email_consent,
        })
    }

    /// Normalised email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plain-text password, zeroised on drop.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Whether the member agreed to receive email.
    pub fn email_consent(&self) -> bool {
        self.email_consent
    }
}

/// Domain error returned when a password change request is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordChangeValidationError {
    #[error("current password must not be empty")]
    EmptyCurrent,
    #[error("new password must be at least {min} characters")]
    TooShort { min: usize },
    #[error("new password must differ from the current one")]
    Unchanged,
}

/// Validated request to replace the signed-in member's password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    current: Zeroizing<String>,
    replacement: Zeroizing<String>,
}

impl PasswordChange {
    pub fn try_from_parts(
        current: &str,
        replacement: &str,
    ) -> Result<Self, PasswordChangeValidationError> {
        if current.is_empty() {
            return Err(PasswordChangeValidationError::EmptyCurrent);
        }
        if replacement.chars().count() < PASSWORD_MIN {
            return Err(PasswordChangeValidationError::TooShort { min: PASSWORD_MIN });
        }
        if current == replacement {
            return Err(PasswordChangeValidationError::Unchanged);
        }
        Ok(Self {
            current: Zeroizing::new(current.to_owned()),
            replacement: Zeroizing::new(replacement.to_owned()),
        })
    }

    /// Password the member claims to hold now.
    pub fn current(&self) -> &str {
        self.current.as_str()
    }

    pub fn replacement(&self) -> &str {
        self.replacement.as_str()
    }
}

/// The authenticated caller of a mutating operation.
///
/// Services take the principal explicitly instead of reading ambient
/// request state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
}

impl Principal {
    /// Wrap an authenticated user id.
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Identifier of the authenticated member.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Whether the principal is `owner`.
    pub fn owns(&self, owner: &UserId) -> bool {
        &self.user_id == owner
    }
}
