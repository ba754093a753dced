//! The signed-in member's own profile and the edits they may make to it.

use serde::Serialize;
use utoipa::ToSchema;

use super::{Nickname, User, UserId};

/// Account details shown only to the member themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[schema(value_type = String)]
    pub user_id: UserId,
    pub email: String,
    pub nickname: String,
    pub email_consent: bool,
    pub total_experience: u32,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.as_ref().to_owned(),
            nickname: user.nickname.to_string(),
            email_consent: user.email_consent,
            total_experience: user.total_experience,
        }
    }
}

/// Requested profile changes. Absent fields stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEdit {
    pub nickname: Option<Nickname>,
    pub email_consent: Option<bool>,
}

impl ProfileEdit {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.email_consent.is_none()
    }

    /// Copy the requested changes onto `user`.
    pub fn apply_to(self, user: &mut User) {
        if let Some(nickname) = self.nickname {
            user.nickname = nickname;
        }
        if let Some(consent) = self.email_consent {
            user.email_consent = consent;
        }
    }
}
