//! Request-shape helpers shared by the HTTP handlers.

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use tracing::debug;

use crate::domain::{
    Error, ORGANISATION_NOT_FOUND, OrganisationId, OrganisationValidationError, USER_NOT_FOUND,
    UserId,
};

/// Parse a user id from a path or body. Malformed ids name no user, so they
/// are reported as not found.
pub(crate) fn user_id_or_not_found(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| Error::not_found(USER_NOT_FOUND))
}

pub(crate) fn organisation_id_or_not_found(raw: &str) -> Result<OrganisationId, Error> {
    OrganisationId::new(raw).map_err(|_| Error::not_found(ORGANISATION_NOT_FOUND))
}

/// Organisation payload problems are client errors with a field list.
pub(crate) fn organisation_payload_error(err: &OrganisationValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_field_error(err.field(), err.to_string())
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected request body");
    let message = match err {
        JsonPayloadError::ContentType => "Request body must be JSON",
        _ => "Request body is not valid JSON",
    };
    Error::invalid_request(message).into()
}

/// JSON extractor configuration rendering body errors as failure envelopes.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(json_error_handler)
}
