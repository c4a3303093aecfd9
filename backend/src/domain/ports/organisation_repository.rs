//! Port for organisation and membership persistence.

use async_trait::async_trait;

use crate::domain::{Organisation, OrganisationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by organisation repository adapters.
    pub enum OrganisationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "organisation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "organisation repository query failed: {message}",
        /// A membership referenced a user or organisation that does not exist.
        MissingReference { message: String } =>
            "organisation membership references a missing record: {message}",
    }
}

/// Result of a membership insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    Added,
    AlreadyMember,
}

/// Port for organisation storage and the membership relation.
///
/// Membership is a plain set: inserting an existing pair is a no-op that
/// reports [`MembershipChange::AlreadyMember`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganisationRepository: Send + Sync {
    /// Insert the organisation and make `member` its first member, atomically.
    async fn create_with_member(
        &self,
        organisation: &Organisation,
        member: &UserId,
    ) -> Result<(), OrganisationRepositoryError>;

    async fn find_by_id(
        &self,
        id: &OrganisationId,
    ) -> Result<Option<Organisation>, OrganisationRepositoryError>;

    /// Organisations `member` belongs to, oldest membership first.
    async fn list_for_member(
        &self,
        member: &UserId,
    ) -> Result<Vec<Organisation>, OrganisationRepositoryError>;

    /// Add `member` to the organisation. Idempotent.
    async fn add_member(
        &self,
        organisation: &OrganisationId,
        member: &UserId,
    ) -> Result<MembershipChange, OrganisationRepositoryError>;
}
