//! Driving ports for account registration and login.
//!
//! Inbound adapters call these to obtain an [`AuthSession`] without knowing
//! how passwords are hashed, tokens are signed, or accounts are stored.

use async_trait::async_trait;

use crate::domain::{AuthSession, Error, LoginCredentials, Registration};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and issue a fresh token.
    ///
    /// Unknown emails and wrong passwords fail identically with
    /// [`crate::domain::ErrorCode::Unauthorized`].
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;
}

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Create the user with a personal organisation and issue a token.
    async fn register(&self, registration: &Registration) -> Result<AuthSession, Error>;
}
