//! Account and user-record handlers.
//!
//! ```text
//! POST /auth/register {"firstName","lastName","email","password","phone"?}
//! POST /auth/login    {"email","password"}
//! GET  /api/users/{id}
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    AUTHENTICATION_FAILED, AuthSession, Error, LoginCredentials, Registration, RegistrationForm,
    RegistrationValidationError, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::envelope::{FailureEnvelope, success};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::user_id_or_not_found;

pub const REGISTRATION_SUCCESSFUL: &str = "Registration successful";
pub const LOGIN_SUCCESSFUL: &str = "Login successful";
pub const USER_RECORD_FOUND: &str = "User record found";

/// Registration request body. Missing or `null` fields read as empty and fail
/// validation with a field-level error.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    #[schema(example = "Ada")]
    pub first_name: Option<String>,
    #[schema(example = "Lovelace")]
    pub last_name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
}

impl RegisterRequest {
    fn form(&self) -> RegistrationForm<'_> {
        RegistrationForm {
            first_name: self.first_name.as_deref().unwrap_or_default(),
            last_name: self.last_name.as_deref().unwrap_or_default(),
            email: self.email.as_deref().unwrap_or_default(),
            password: self.password.as_deref().unwrap_or_default(),
            phone: self.phone.as_deref(),
        }
    }
}

/// Login request body. Missing or `null` fields read as empty.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
}

fn registration_error(err: &RegistrationValidationError) -> Error {
    Error::validation(err.field(), err.to_string())
}

/// Create an account, its personal organisation, and an access token.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthSession),
        (status = 422, description = "Validation failed", body = FailureEnvelope),
        (status = 503, description = "Database unavailable", body = FailureEnvelope)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from_form(payload.form()).map_err(|err| registration_error(&err))?;
    let session = state.registration.register(&registration).await?;
    Ok(success(StatusCode::CREATED, REGISTRATION_SUCCESSFUL, session))
}

/// Exchange email and password for a fresh access token.
///
/// Every credential failure, malformed input included, returns the same 401.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthSession),
        (status = 401, description = "Authentication failed", body = FailureEnvelope)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(
        payload.email.as_deref().unwrap_or_default(),
        payload.password.as_deref().unwrap_or_default(),
    )
    .map_err(|err| {
        debug!(reason = %err, "login payload rejected");
        Error::unauthorized(AUTHENTICATION_FAILED)
    })?;
    let session = state.login.login(&credentials).await?;
    Ok(success(StatusCode::OK, LOGIN_SUCCESSFUL, session))
}

/// Fetch a user record visible to the caller.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User record found", body = User),
        (status = 401, description = "Missing or invalid token", body = FailureEnvelope),
        (status = 403, description = "No shared organisation", body = FailureEnvelope),
        (status = 404, description = "User not found", body = FailureEnvelope)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security(("bearer" = []))
)]
pub async fn get_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target = user_id_or_not_found(&path)?;
    let user = state.users.user_record(&caller.id(), &target).await?;
    Ok(success(StatusCode::OK, USER_RECORD_FOUND, user))
}

#[cfg(test)]
mod tests;
