//! Registration and login use-cases.
//!
//! Registration validates nothing itself: the [`Registration`] it receives is
//! already validated. It hashes the password, builds the user and their
//! personal organisation, signs the access token, and only then hands all
//! three records to the repository in a single atomic write. A signing failure
//! therefore leaves nothing behind.
//!
//! Login verifies against a dummy hash when the email is unknown, so both
//! rejection paths cost one Argon2 verification.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::ports::{
    LoginService, NewAccount, PasswordHasher, PasswordHasherError, RegistrationCommand,
    TokenError, TokenService, UserRepository, UserRepositoryError,
};
use crate::domain::{
    AccessToken, AuthSession, Error, LoginCredentials, Organisation, OrganisationId,
    OrganisationName, PasswordHash, Registration, RegistrationValidationError, User, UserId,
};

/// Message returned for every failed login, whatever the cause.
pub const AUTHENTICATION_FAILED: &str = "Authentication failed";

/// Password hashed once per service to verify against for unknown emails.
const DUMMY_PASSWORD: &str = "tenancy-unknown-account";

/// Account service implementing [`RegistrationCommand`] and [`LoginService`].
pub struct AccountService<U: ?Sized, H: ?Sized, T: ?Sized> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    dummy_hash: Arc<OnceCell<PasswordHash>>,
}

impl<U: ?Sized, H: ?Sized, T: ?Sized> Clone for AccountService<U, H, T> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            hasher: Arc::clone(&self.hasher),
            tokens: Arc::clone(&self.tokens),
            dummy_hash: Arc::clone(&self.dummy_hash),
        }
    }
}

impl<U: ?Sized, H: ?Sized, T: ?Sized> AccountService<U, H, T> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }
}

impl<U, H, T> AccountService<U, H, T>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
    T: TokenService + ?Sized,
{
    fn map_user_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::DuplicateEmail { .. } => {
                let taken = RegistrationValidationError::EmailTaken;
                Error::validation(taken.field(), taken.to_string())
            }
        }
    }

    fn map_hasher_error(error: PasswordHasherError) -> Error {
        Error::internal(error.to_string())
    }

    fn issue_token(&self, user: &UserId) -> Result<AccessToken, Error> {
        self.tokens.issue(user).map_err(|error: TokenError| {
            Error::internal(format!("failed to issue access token: {error}"))
        })
    }

    /// Spend one verification on a dummy hash. The outcome is discarded.
    async fn verify_against_dummy(&self, password: &str) {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.hasher.hash(DUMMY_PASSWORD))
            .await;
        let outcome = match dummy {
            Ok(hash) => self.hasher.verify(password, hash).await.map(drop),
            Err(error) => Err(error),
        };
        if let Err(error) = outcome {
            debug!(%error, "dummy verification failed");
        }
    }
}

#[async_trait]
impl<U, H, T> RegistrationCommand for AccountService<U, H, T>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
    T: TokenService + ?Sized,
{
    async fn register(&self, registration: &Registration) -> Result<AuthSession, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(Self::map_hasher_error)?;

        let user_id = UserId::random();
        let token = self.issue_token(&user_id)?;
        let user = User::new(
            user_id,
            registration.first_name().clone(),
            registration.last_name().clone(),
            registration.email().clone(),
            registration.phone().cloned(),
        );
        let organisation = Organisation::new(
            OrganisationId::random(),
            OrganisationName::default_for(registration.first_name()),
            None,
        );
        let account = NewAccount {
            user,
            password_hash,
            organisation,
        };

        self.users
            .create_account(&account)
            .await
            .map_err(Self::map_user_error)?;

        let NewAccount {
            user, organisation, ..
        } = account;
        info!(
            user_id = %user.id(),
            organisation_id = %organisation.id(),
            "account registered"
        );
        Ok(AuthSession::new(token, user))
    }
}

#[async_trait]
impl<U, H, T> LoginService for AccountService<U, H, T>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
    T: TokenService + ?Sized,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let Some(stored) = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(Self::map_user_error)?
        else {
            self.verify_against_dummy(credentials.password()).await;
            debug!("login rejected: unknown email");
            return Err(Error::unauthorized(AUTHENTICATION_FAILED));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(Self::map_hasher_error)?;
        if !matches {
            debug!(user_id = %stored.user.id(), "login rejected: password mismatch");
            return Err(Error::unauthorized(AUTHENTICATION_FAILED));
        }

        let token = self.issue_token(&stored.user.id())?;
        info!(user_id = %stored.user.id(), "login succeeded");
        Ok(AuthSession::new(token, stored.user))
    }
}
