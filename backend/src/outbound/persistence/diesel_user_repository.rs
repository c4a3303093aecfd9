//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{NewAccount, StoredCredentials, UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, OrganisationId, User, UserId};

use super::diesel_error_mapping::{DieselFailure, classify};
use super::models::{
    CredentialsRow, NewMembershipRow, NewOrganisationRow, NewUserRow, UserRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{organisation_members, organisations, users};

/// Diesel-backed implementation of the [`UserRepository`] port.
///
/// # Examples
/// ```no_run
/// use tenancy::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
///
/// # async fn build() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = DbPool::new(PoolConfig::new("postgres://localhost/tenancy")).await?;
/// let repository = DieselUserRepository::new(pool);
/// # let _ = repository;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error, email: Option<&str>) -> UserRepositoryError {
    match classify(error) {
        DieselFailure::Connection(message) => UserRepositoryError::connection(message),
        DieselFailure::DuplicateEmail => {
            UserRepositoryError::duplicate_email(email.unwrap_or_default())
        }
        DieselFailure::MissingReference(message) | DieselFailure::Query(message) => {
            UserRepositoryError::query(message)
        }
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    User::try_from(row).map_err(UserRepositoryError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create_account(&self, account: &NewAccount) -> Result<(), UserRepositoryError> {
        let user_row = NewUserRow::new(&account.user, &account.password_hash);
        let organisation_row = NewOrganisationRow::from(&account.organisation);
        let membership = NewMembershipRow {
            org_id: *account.organisation.id().as_uuid(),
            user_id: *account.user.id().as_uuid(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&user_row)
                    .execute(conn)
                    .await?;
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
        .map_err(|err| map_diesel_error(err, Some(account.user.email().as_ref())))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::user_id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(row_to_user).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(CredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;

        row.map(|row| {
            row.into_parts()
                .map(|(user, password_hash)| StoredCredentials {
                    user,
                    password_hash,
                })
                .map_err(UserRepositoryError::query)
        })
        .transpose()
    }

    async fn organisation_ids(
        &self,
        id: &UserId,
    ) -> Result<HashSet<OrganisationId>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<Uuid> = organisation_members::table
            .filter(organisation_members::user_id.eq(id.as_uuid()))
            .select(organisation_members::org_id)
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        Ok(ids.into_iter().map(OrganisationId::from).collect())
    }
}
