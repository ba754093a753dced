//! Registration, login, and self-service account changes.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, PasswordHashing, UserPersistenceError, UserRepository,
};
use crate::domain::service_errors::{incorrect_password, map_hashing_error, map_user_error};
use crate::domain::{
    Error, LoginCredentials, Nickname, PasswordChange, PasswordDigest, Principal, Profile,
    ProfileEdit, Registration, User, UserId,
};

/// Account service implementing [`AccountCommand`].
pub struct AccountService<U> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHashing>,
    clock: Arc<dyn Clock>,
}

impl<U> AccountService<U> {
    pub fn new(users: Arc<U>, hasher: Arc<dyn PasswordHashing>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }

    /// Hash off the async executor; Argon2 is deliberately slow.
    async fn hash(&self, password: &str) -> Result<PasswordDigest, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hashing_error)
    }

    async fn verify(&self, password: &str, digest: PasswordDigest) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
            .map_err(map_hashing_error)
    }
}

impl<U> AccountService<U>
where
    U: UserRepository,
{
    async fn member(&self, principal: &Principal) -> Result<User, Error> {
        self.users
            .find_by_id(principal.user_id())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

/// Nickname used when the email's local part is already taken.
fn fallback_nickname(base: &Nickname, id: &UserId) -> Option<Nickname> {
    let simple = id.as_uuid().simple().to_string();
    let suffix = simple.get(..6)?;
    let stem: String = base.as_ref().chars().take(crate::domain::NICKNAME_MAX - 7).collect();
    Nickname::new(format!("{stem}-{suffix}")).ok()
}

#[async_trait]
impl<U> AccountCommand for AccountService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: &Registration) -> Result<UserId, Error> {
        let email = registration.email().clone();
        if self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(map_user_error(UserPersistenceError::duplicate_email()));
        }

        let nickname = Nickname::from_email(&email).map_err(|err| {
            Error::invalid_request(format!("email cannot be used as a nickname: {err}"))
        })?;
        let digest = self.hash(registration.password()).await?;
        let mut user = User::register(
            email,
            nickname,
            digest,
            registration.email_consent(),
            self.clock.utc(),
        );

        match self.users.insert(&user).await {
            Ok(()) => {}
            Err(UserPersistenceError::DuplicateNickname) => {
                let Some(fallback) = fallback_nickname(&user.nickname, &user.id) else {
                    return Err(map_user_error(UserPersistenceError::duplicate_nickname()));
                };
                user.nickname = fallback;
                self.users.insert(&user).await.map_err(map_user_error)?;
            }
            Err(err) => return Err(map_user_error(err)),
        }

        info!(user_id = %user.id, "member registered");
        Ok(user.id)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;

        if self.verify(credentials.password(), user.password.clone()).await? {
            Ok(user.id)
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }

    async fn profile(&self, principal: &Principal) -> Result<Profile, Error> {
        let user = self.member(principal).await?;
        Ok(Profile::from(&user))
    }

    async fn update_profile(
        &self,
        principal: &Principal,
        edit: ProfileEdit,
    ) -> Result<Profile, Error> {
        if edit.is_empty() {
            return Err(Error::invalid_request("request must change at least one field"));
        }
        let mut user = self.member(principal).await?;
        edit.apply_to(&mut user);
        if !self.users.update_profile(&user).await.map_err(map_user_error)? {
            return Err(Error::not_found("user not found"));
        }
        info!(user_id = %user.id, "profile updated");
        Ok(Profile::from(&user))
    }

    async fn change_password(
        &self,
        principal: &Principal,
        change: &PasswordChange,
    ) -> Result<(), Error> {
        let user = self.member(principal).await?;
        if !self.verify(change.current(), user.password).await? {
            return Err(incorrect_password());
        }
        let digest = self.hash(change.replacement()).await?;
        if !self
            .users
            .update_password(&user.id, &digest)
            .await
            .map_err(map_user_error)?
        {
            return Err(Error::not_found("user not found"));
        }
        info!(user_id = %user.id, "password changed");
        Ok(())
    }
}
