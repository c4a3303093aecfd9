//! Shared Diesel error classification for the directory repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Name of the unique constraint guarding `users.email`.
pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";

/// Coarse category of a Diesel failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    Connection(String),
    DuplicateEmail,
    MissingReference(String),
    Query(String),
}

/// Classify a Diesel error, logging the detail at debug level.
///
/// Messages returned here are generic; database detail stays in the logs.
pub(crate) fn classify(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info.constraint_name() == Some(USERS_EMAIL_KEY) =>
        {
            DieselFailure::DuplicateEmail
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::MissingReference(
                info.constraint_name()
                    .unwrap_or("organisation_members foreign key")
                    .to_owned(),
            )
        }
        DieselError::NotFound => DieselFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error".to_owned()),
        _ => DieselFailure::Query("database error".to_owned()),
    }
}
