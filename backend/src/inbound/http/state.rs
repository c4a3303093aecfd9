//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LoginService, OrganisationRepository, OrganisationsCommand, OrganisationsQuery,
    PasswordHasher, RegistrationCommand, TokenService, UserRepository, UsersQuery,
};
use crate::domain::{AccountService, DirectoryService};

/// Dependency bundle for HTTP handlers and the bearer gate.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationCommand>,
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub organisations: Arc<dyn OrganisationsQuery>,
    pub organisations_command: Arc<dyn OrganisationsCommand>,
    pub tokens: Arc<dyn TokenService>,
}

impl HttpState {
    /// Wire the domain services over the given driven adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// use tenancy::inbound::http::state::HttpState;
    /// use tenancy::outbound::memory::InMemoryDirectory;
    /// use tenancy::outbound::security::{Argon2PasswordHasher, JwtTokenService};
    ///
    /// let directory = Arc::new(InMemoryDirectory::default());
    /// let state = HttpState::from_adapters(
    ///     directory.clone(),
    ///     directory,
    ///     Arc::new(Argon2PasswordHasher::default()),
    ///     Arc::new(JwtTokenService::new(b"secret", "tenancy", Duration::from_secs(60))),
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn from_adapters(
        users: Arc<dyn UserRepository>,
        organisations: Arc<dyn OrganisationRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        let accounts = Arc::new(AccountService::new(
            Arc::clone(&users),
            hasher,
            Arc::clone(&tokens),
        ));
        let directory = Arc::new(DirectoryService::new(users, organisations));

        Self {
            registration: accounts.clone(),
            login: accounts,
            users: directory.clone(),
            organisations: directory.clone(),
            organisations_command: directory,
            tokens,
        }
    }
}
