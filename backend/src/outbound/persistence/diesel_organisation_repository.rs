//! PostgreSQL-backed `OrganisationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{
    MembershipChange, OrganisationRepository, OrganisationRepositoryError,
};
use crate::domain::{Organisation, OrganisationId, UserId};

use super::diesel_error_mapping::{DieselFailure, classify};
use super::models::{NewMembershipRow, NewOrganisationRow, OrganisationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{organisation_members, organisations};

/// Diesel-backed implementation of the [`OrganisationRepository`] port.
#[derive(Clone)]
pub struct DieselOrganisationRepository {
    pool: DbPool,
}

impl DieselOrganisationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrganisationRepositoryError {
    OrganisationRepositoryError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error) -> OrganisationRepositoryError {
    match classify(error) {
        DieselFailure::Connection(message) => OrganisationRepositoryError::connection(message),
        DieselFailure::MissingReference(message) => {
            OrganisationRepositoryError::missing_reference(message)
        }
        DieselFailure::DuplicateEmail => {
            OrganisationRepositoryError::query("unexpected email conflict")
        }
        DieselFailure::Query(message) => OrganisationRepositoryError::query(message),
    }
}

fn row_to_organisation(row: OrganisationRow) -> Result<Organisation, OrganisationRepositoryError> {
    Organisation::try_from(row).map_err(OrganisationRepositoryError::query)
}

#[async_trait]
impl OrganisationRepository for DieselOrganisationRepository {
    async fn create_with_member(
        &self,
        organisation: &Organisation,
        member: &UserId,
    ) -> Result<(), OrganisationRepositoryError> {
        let organisation_row = NewOrganisationRow::from(organisation);
        let membership = NewMembershipRow {
            org_id: *organisation.id().as_uuid(),
            user_id: *member.as_uuid(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(organisations::table)
                    .values(&organisation_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(organisation_members::table)
                    .values(&membership)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &OrganisationId,
    ) -> Result<Option<Organisation>, OrganisationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = organisations::table
            .filter(organisations::org_id.eq(id.as_uuid()))
            .select(OrganisationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_organisation).transpose()
    }

    async fn list_for_member(
        &self,
        member: &UserId,
    ) -> Result<Vec<Organisation>, OrganisationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrganisationRow> = organisation_members::table
            .inner_join(organisations::table)
            .filter(organisation_members::user_id.eq(member.as_uuid()))
            .order((
                organisation_members::joined_at.asc(),
                organisations::org_id.asc(),
            ))
            .select(OrganisationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_organisation).collect()
    }

    async fn add_member(
        &self,
        organisation: &OrganisationId,
        member: &UserId,
    ) -> Result<MembershipChange, OrganisationRepositoryError> {
        let membership = NewMembershipRow {
            org_id: *organisation.as_uuid(),
            user_id: *member.as_uuid(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(organisation_members::table)
            .values(&membership)
            .on_conflict((organisation_members::org_id, organisation_members::user_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(if inserted == 0 {
            MembershipChange::AlreadyMember
        } else {
            MembershipChange::Added
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let err = map_pool_error(PoolError::checkout("refused"));
        assert_eq!(err, OrganisationRepositoryError::connection("refused"));
    }

    #[rstest]
    fn query_builder_errors_are_query_errors() {
        let err = map_diesel_error(diesel::result::Error::QueryBuilderError("bad".into()));
        assert!(matches!(err, OrganisationRepositoryError::Query { .. }));
    }
}
