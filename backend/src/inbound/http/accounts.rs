//! Account endpoints: sign-up, sign-in, sign-out, and the member's own
//! profile and password.
//!
//! ```text
//! POST  /api/v1/register {"email":"ada@example.com","password":"correct horse","emailConsent":true}
//! POST  /api/v1/login    {"email":"ada@example.com","password":"correct horse"}
//! POST  /api/v1/logout
//! GET   /api/v1/users/me
//! PATCH /api/v1/users/me {"nickname":"countess","emailConsent":false}
//! PUT   /api/v1/users/me/password {"currentPassword":"...","newPassword":"..."}
//! ```

use actix_web::{HttpResponse, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, LoginCredentials, Nickname, PasswordChange, Profile, ProfileEdit, Registration, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    credentials_error, empty_edit_error, nickname_error, password_change_error,
};

/// Sign-up request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
    /// Whether the member agrees to receive email.
    #[serde(default)]
    pub email_consent: bool,
}

/// Sign-in request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Identifier of the member bound to the new session.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: UserId,
}

/// Body for `PATCH /api/v1/users/me`. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub nickname: Option<String>,
    pub email_consent: Option<bool>,
}

impl TryFrom<UpdateProfileRequest> for ProfileEdit {
    type Error = Error;

    fn try_from(value: UpdateProfileRequest) -> Result<Self, Self::Error> {
        let edit = ProfileEdit {
            nickname: value
                .nickname
                .map(Nickname::new)
                .transpose()
                .map_err(nickname_error)?,
            email_consent: value.email_consent,
        };
        if edit.is_empty() {
            return Err(empty_edit_error());
        }
        Ok(edit)
    }
}

/// Body for `PUT /api/v1/users/me/password`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Register a member and sign them in.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Member registered", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        password,
        email_consent,
    } = payload.into_inner();
    let registration =
        Registration::try_from_parts(&email, &password, email_consent).map_err(credentials_error)?;
    let user_id = state.accounts.register(&registration).await?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Created().json(SessionResponse { user_id }))
}

/// Authenticate by email and password and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(credentials_error)?;
    let user_id = state.accounts.login(&credentials).await?;
    session.persist_user(&user_id)?;
    Ok(web::Json(SessionResponse { user_id }))
}

/// End the current session. Succeeds even when nobody is signed in.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Profile of the signed-in member.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Member no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "getProfile"
)]
#[get("/users/me")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Profile>> {
    let principal = session.require_principal()?;
    let profile = state.accounts.profile(&principal).await?;
    Ok(web::Json(profile))
}

/// Change the signed-in member's nickname or email consent.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 409, description = "Nickname already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "updateProfile"
)]
#[patch("/users/me")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<Profile>> {
    let principal = session.require_principal()?;
    let edit = ProfileEdit::try_from(payload.into_inner())?;
    let profile = state.accounts.update_profile(&principal, edit).await?;
    Ok(web::Json(profile))
}

/// Replace the signed-in member's password. The session stays valid.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request or wrong current password", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "changePassword"
)]
#[put("/users/me/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let ChangePasswordRequest {
        current_password,
        new_password,
    } = payload.into_inner();
    let change = PasswordChange::try_from_parts(&current_password, &new_password)
        .map_err(password_change_error)?;
    state.accounts.change_password(&principal, &change).await?;
    Ok(HttpResponse::NoContent().finish())
}
