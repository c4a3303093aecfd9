//! OpenAPI document for the REST API.
//!
//! Served by Swagger UI in debug builds. Protected operations reference the
//! `bearer` scheme registered by [`SecurityAddon`].

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{AuthSession, FieldError, Organisation, User};
use crate::inbound::http::envelope::FailureEnvelope;
use crate::inbound::http::organisations::{
    AddUserRequest, CreateOrganisationRequest, OrganisationList,
};
use crate::inbound::http::users::{LoginRequest, RegisterRequest};

/// Registers the JWT bearer scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token from POST /auth/register or /auth/login."))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tenancy API",
        description = "Accounts, token authentication and organisation membership."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::get_user,
        crate::inbound::http::organisations::list_organisations,
        crate::inbound::http::organisations::create_organisation,
        crate::inbound::http::organisations::get_organisation,
        crate::inbound::http::organisations::add_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        AuthSession,
        User,
        Organisation,
        OrganisationList,
        FieldError,
        FailureEnvelope,
        RegisterRequest,
        LoginRequest,
        CreateOrganisationRequest,
        AddUserRequest,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "User records"),
        (name = "organisations", description = "Organisations and membership"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;
