//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types re-run the
//! domain validation so a corrupted row surfaces as a query error rather than
//! an invalid value.

use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    EmailAddress, NameField, Organisation, OrganisationDescription, OrganisationId,
    OrganisationName, PasswordHash, PersonName, PhoneNumber, User, UserId,
};

use super::schema::{organisation_members, organisations, users};

/// Public columns of the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// User columns plus the stored password hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialsRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password_hash: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub user_id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = organisations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrganisationRow {
    pub org_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = organisations)]
pub(crate) struct NewOrganisationRow<'a> {
    pub org_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = organisation_members)]
pub(crate) struct NewMembershipRow {
    pub org_id: Uuid,
    pub user_id: Uuid,
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn new(user: &'a User, password_hash: &'a PasswordHash) -> Self {
        Self {
            user_id: *user.id().as_uuid(),
            first_name: user.first_name().as_ref(),
            last_name: user.last_name().as_ref(),
            email: user.email().as_ref(),
            phone: user.phone().map(AsRef::as_ref),
            password_hash: password_hash.as_str(),
        }
    }
}

impl<'a> From<&'a Organisation> for NewOrganisationRow<'a> {
    fn from(organisation: &'a Organisation) -> Self {
        Self {
            org_id: *organisation.id().as_uuid(),
            name: organisation.name().as_ref(),
            description: organisation.description().map(AsRef::as_ref),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let invalid = |err: crate::domain::UserValidationError| {
            format!("stored user {} is invalid: {err}", row.user_id)
        };
        Ok(User::new(
            UserId::from(row.user_id),
            PersonName::new(NameField::First, &row.first_name).map_err(invalid)?,
            PersonName::new(NameField::Last, &row.last_name).map_err(invalid)?,
            EmailAddress::new(&row.email).map_err(invalid)?,
            row.phone
                .as_deref()
                .map(PhoneNumber::new)
                .transpose()
                .map_err(invalid)?
                .flatten(),
        ))
    }
}

impl CredentialsRow {
    pub(crate) fn into_parts(self) -> Result<(User, PasswordHash), String> {
        let user = User::try_from(self.user)?;
        Ok((user, PasswordHash::new(self.password_hash)))
    }
}

impl TryFrom<OrganisationRow> for Organisation {
    type Error = String;

    fn try_from(row: OrganisationRow) -> Result<Self, Self::Error> {
        let invalid = |err: crate::domain::OrganisationValidationError| {
            format!("stored organisation {} is invalid: {err}", row.org_id)
        };
        let name = OrganisationName::new(&row.name).map_err(invalid)?;
        let description = match row.description.as_deref() {
            Some(raw) => OrganisationDescription::new(raw).map_err(invalid)?,
            None => None,
        };
        Ok(Organisation::new(
            OrganisationId::from(row.org_id),
            name,
            description,
        ))
    }
}
