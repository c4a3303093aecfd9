//! User-record and organisation use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    MembershipChange, OrganisationRepository, OrganisationRepositoryError, OrganisationsCommand,
    OrganisationsQuery, UserRepository, UserRepositoryError, UsersQuery,
};
use crate::domain::{
    Error, NewOrganisation, Organisation, OrganisationId, User, UserId, Visibility,
    record_visibility,
};

pub const USER_NOT_FOUND: &str = "User not found";
pub const ORGANISATION_NOT_FOUND: &str = "Organisation not found";
pub const RECORD_FORBIDDEN: &str = "You do not have permission to view this user.";

/// Directory service implementing the user-record and organisation ports.
pub struct DirectoryService<U: ?Sized, O: ?Sized> {
    users: Arc<U>,
    organisations: Arc<O>,
}

impl<U: ?Sized, O: ?Sized> Clone for DirectoryService<U, O> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            organisations: Arc::clone(&self.organisations),
        }
    }
}

impl<U: ?Sized, O: ?Sized> DirectoryService<U, O> {
    pub fn new(users: Arc<U>, organisations: Arc<O>) -> Self {
        Self {
            users,
            organisations,
        }
    }
}

impl<U, O> DirectoryService<U, O>
where
    U: UserRepository + ?Sized,
    O: OrganisationRepository + ?Sized,
{
    fn map_user_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            other => Error::internal(format!("user repository error: {other}")),
        }
    }

    fn map_organisation_error(error: OrganisationRepositoryError) -> Error {
        match error {
            OrganisationRepositoryError::Connection { message } => Error::service_unavailable(
                format!("organisation repository unavailable: {message}"),
            ),
            OrganisationRepositoryError::Query { message } => {
                Error::internal(format!("organisation repository error: {message}"))
            }
            OrganisationRepositoryError::MissingReference { message } => {
                debug!(%message, "membership references a missing record");
                Error::not_found(USER_NOT_FOUND)
            }
        }
    }

    async fn require_user(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn require_organisation(&self, id: &OrganisationId) -> Result<Organisation, Error> {
        self.organisations
            .find_by_id(id)
            .await
            .map_err(Self::map_organisation_error)?
            .ok_or_else(|| Error::not_found(ORGANISATION_NOT_FOUND))
    }
}

#[async_trait]
impl<U, O> UsersQuery for DirectoryService<U, O>
where
    U: UserRepository + ?Sized,
    O: OrganisationRepository + ?Sized,
{
    async fn user_record(&self, requester: &UserId, target: &UserId) -> Result<User, Error> {
        let user = self.require_user(target).await?;
        if requester == target {
            return Ok(user);
        }

        let requester_orgs = self
            .users
            .organisation_ids(requester)
            .await
            .map_err(Self::map_user_error)?;
        let target_orgs = self
            .users
            .organisation_ids(target)
            .await
            .map_err(Self::map_user_error)?;

        match record_visibility(*requester, &requester_orgs, *target, &target_orgs) {
            Visibility::Denied => {
                debug!(%requester, %target, "user record hidden: no shared organisation");
                Err(Error::forbidden(RECORD_FORBIDDEN))
            }
            Visibility::Own | Visibility::SharedOrganisation => Ok(user),
        }
    }
}

#[async_trait]
impl<U, O> OrganisationsQuery for DirectoryService<U, O>
where
    U: UserRepository + ?Sized,
    O: OrganisationRepository + ?Sized,
{
    async fn list_for_member(&self, member: &UserId) -> Result<Vec<Organisation>, Error> {
        self.organisations
            .list_for_member(member)
            .await
            .map_err(Self::map_organisation_error)
    }

    async fn organisation(&self, id: &OrganisationId) -> Result<Organisation, Error> {
        self.require_organisation(id).await
    }
}

#[async_trait]
impl<U, O> OrganisationsCommand for DirectoryService<U, O>
where
    U: UserRepository + ?Sized,
    O: OrganisationRepository + ?Sized,
{
    async fn create(
        &self,
        creator: &UserId,
        organisation: NewOrganisation,
    ) -> Result<Organisation, Error> {
        let organisation = organisation.into_organisation();
        self.organisations
            .create_with_member(&organisation, creator)
            .await
            .map_err(Self::map_organisation_error)?;
        info!(
            organisation_id = %organisation.id(),
            creator = %creator,
            "organisation created"
        );
        Ok(organisation)
    }

    async fn add_member(
        &self,
        organisation: &OrganisationId,
        member: &UserId,
    ) -> Result<(), Error> {
        self.require_organisation(organisation).await?;
        self.require_user(member).await?;

        let change = self
            .organisations
            .add_member(organisation, member)
            .await
            .map_err(Self::map_organisation_error)?;
        match change {
            MembershipChange::Added => {
                info!(organisation_id = %organisation, user_id = %member, "member added");
            }
            MembershipChange::AlreadyMember => {
                debug!(organisation_id = %organisation, user_id = %member, "already a member");
            }
        }
        Ok(())
    }
}
