//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod organisation_repository;
mod organisations;
mod password_hasher;
mod token_service;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use login_service::{MockLoginService, MockRegistrationCommand};
pub use login_service::{LoginService, RegistrationCommand};
#[cfg(test)]
pub use organisation_repository::MockOrganisationRepository;
pub use organisation_repository::{
    MembershipChange, OrganisationRepository, OrganisationRepositoryError,
};
#[cfg(test)]
pub use organisations::{MockOrganisationsCommand, MockOrganisationsQuery};
pub use organisations::{OrganisationsCommand, OrganisationsQuery};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewAccount, StoredCredentials, UserRepository, UserRepositoryError};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
