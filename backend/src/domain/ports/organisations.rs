//! Driving ports for organisation reads and writes.

use async_trait::async_trait;

use crate::domain::{Error, NewOrganisation, Organisation, OrganisationId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganisationsQuery: Send + Sync {
    /// Organisations the member belongs to.
    async fn list_for_member(&self, member: &UserId) -> Result<Vec<Organisation>, Error>;

    /// Look up one organisation; `NotFound` when absent.
    async fn organisation(&self, id: &OrganisationId) -> Result<Organisation, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganisationsCommand: Send + Sync {
    /// Create an organisation with `creator` as its first member.
    async fn create(
        &self,
        creator: &UserId,
        organisation: NewOrganisation,
    ) -> Result<Organisation, Error>;

    /// Add an existing user to an existing organisation. Idempotent.
    async fn add_member(&self, organisation: &OrganisationId, member: &UserId)
    -> Result<(), Error>;
}
