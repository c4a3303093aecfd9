//! Organisation handlers.
//!
//! ```text
//! GET  /api/organisations
//! POST /api/organisations                 {"name","description"?}
//! GET  /api/organisations/{orgId}
//! POST /api/organisations/{orgId}/users   {"userId"}
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, NewOrganisation, Organisation, USER_NOT_FOUND};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::envelope::{FailureEnvelope, success, success_message};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    organisation_id_or_not_found, organisation_payload_error, user_id_or_not_found,
};

pub const USER_ORGANISATIONS: &str = "User organisations";
pub const ORGANISATION_CREATED: &str = "Organisation created successfully";
pub const ORGANISATION_FOUND: &str = "Organisation Found";
pub const MEMBER_ADDED: &str = "User added to organisation successfully";

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(default)]
pub struct CreateOrganisationRequest {
    #[schema(example = "Analytical Engines")]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AddUserRequest {
    pub user_id: Option<String>,
}

/// `data` payload for the organisation list.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OrganisationList {
    pub organisations: Vec<Organisation>,
}

/// Organisations the caller belongs to, oldest membership first.
#[utoipa::path(
    get,
    path = "/api/organisations",
    responses(
        (status = 200, description = "User organisations", body = OrganisationList),
        (status = 401, description = "Missing or invalid token", body = FailureEnvelope)
    ),
    tags = ["organisations"],
    operation_id = "listOrganisations",
    security(("bearer" = []))
)]
pub async fn list_organisations(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let organisations = state.organisations.list_for_member(&caller.id()).await?;
    Ok(success(
        StatusCode::OK,
        USER_ORGANISATIONS,
        OrganisationList { organisations },
    ))
}

/// Create an organisation with the caller as its first member.
#[utoipa::path(
    post,
    path = "/api/organisations",
    request_body = CreateOrganisationRequest,
    responses(
        (status = 201, description = "Organisation created", body = Organisation),
        (status = 400, description = "Invalid payload", body = FailureEnvelope),
        (status = 401, description = "Missing or invalid token", body = FailureEnvelope)
    ),
    tags = ["organisations"],
    operation_id = "createOrganisation",
    security(("bearer" = []))
)]
pub async fn create_organisation(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateOrganisationRequest>,
) -> ApiResult<HttpResponse> {
    let request = NewOrganisation::try_from_parts(
        payload.name.as_deref().unwrap_or_default(),
        payload.description.as_deref(),
    )
    .map_err(|err| organisation_payload_error(&err))?;
    let organisation = state
        .organisations_command
        .create(&caller.id(), request)
        .await?;
    Ok(success(StatusCode::CREATED, ORGANISATION_CREATED, organisation))
}

/// Look up any organisation by id. No token required.
#[utoipa::path(
    get,
    path = "/api/organisations/{orgId}",
    params(("orgId" = String, Path, description = "Organisation id")),
    responses(
        (status = 200, description = "Organisation Found", body = Organisation),
        (status = 404, description = "Organisation not found", body = FailureEnvelope)
    ),
    tags = ["organisations"],
    operation_id = "getOrganisation",
    security([])
)]
pub async fn get_organisation(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = organisation_id_or_not_found(&path)?;
    let organisation = state.organisations.organisation(&id).await?;
    Ok(success(StatusCode::OK, ORGANISATION_FOUND, organisation))
}

/// Add a user to an organisation. Repeating the call is harmless.
#[utoipa::path(
    post,
    path = "/api/organisations/{orgId}/users",
    params(("orgId" = String, Path, description = "Organisation id")),
    request_body = AddUserRequest,
    responses(
        (status = 200, description = "User added"),
        (status = 401, description = "Missing or invalid token", body = FailureEnvelope),
        (status = 404, description = "Organisation or user not found", body = FailureEnvelope)
    ),
    tags = ["organisations"],
    operation_id = "addUserToOrganisation",
    security(("bearer" = []))
)]
pub async fn add_user(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<AddUserRequest>,
) -> ApiResult<HttpResponse> {
    let organisation = organisation_id_or_not_found(&path)?;
    let user = payload
        .user_id
        .as_deref()
        .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
        .and_then(user_id_or_not_found)?;
    state
        .organisations_command
        .add_member(&organisation, &user)
        .await?;
    Ok(success_message(StatusCode::OK, MEMBER_ADDED))
}
