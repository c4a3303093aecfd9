//! Port abstraction for user persistence adapters and their errors.
use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::{EmailAddress, Organisation, OrganisationId, PasswordHash, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Everything written when an account is registered.
///
/// Adapters persist the user, the personal organisation, and the membership
/// linking them as one unit: either all three exist afterwards or none do.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user: User,
    pub password_hash: PasswordHash,
    pub organisation: Organisation,
}

/// Profile plus stored hash, used only for credential checks.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: PasswordHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Atomically insert the user, their organisation, and the membership.
    ///
    /// Returns [`UserRepositoryError::DuplicateEmail`] when the email is taken.
    async fn create_account(&self, account: &NewAccount) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the profile and password hash registered under `email`.
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Identifiers of every organisation the user belongs to.
    async fn organisation_ids(
        &self,
        id: &UserId,
    ) -> Result<HashSet<OrganisationId>, UserRepositoryError>;
}
