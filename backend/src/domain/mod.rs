//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, plus the services that implement the driving ports. Types are
//! immutable once built and document their invariants in Rustdoc.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`] / [`FieldError`]: transport-agnostic failures.
//! - [`User`] and its field newtypes: registered accounts.
//! - [`Organisation`] and its field newtypes: tenant groups.
//! - [`AccountService`] and [`DirectoryService`]: driving-port implementations.

mod access;
mod account_service;
mod auth;
mod directory_service;
pub mod error;
mod organisation;
pub mod ports;
#[cfg(test)]
pub(crate) mod test_fixtures;
mod trace_id;
mod user;

pub use self::access::{Visibility, record_visibility};
pub use self::account_service::{AUTHENTICATION_FAILED, AccountService};
pub use self::auth::{
    AccessToken, AuthSession, LoginCredentials, LoginValidationError, PasswordHash, Registration,
    RegistrationForm, RegistrationValidationError,
};
pub use self::directory_service::{
    DirectoryService, ORGANISATION_NOT_FOUND, RECORD_FORBIDDEN, USER_NOT_FOUND,
};
pub use self::error::{Error, ErrorCode, FieldError};
pub use self::organisation::{
    NewOrganisation, ORGANISATION_DESCRIPTION_MAX, ORGANISATION_NAME_MAX, Organisation,
    OrganisationDescription, OrganisationId, OrganisationName, OrganisationValidationError,
    title_case,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    EMAIL_MAX, EmailAddress, NameField, PERSON_NAME_MAX, PHONE_MAX, PersonName, PhoneNumber,
    User, UserId, UserValidationError,
};

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";
