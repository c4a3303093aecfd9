//! Port for issuing and verifying bearer tokens.

use crate::domain::{AccessToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
        /// The token is malformed, has a bad signature, or names no user.
        Invalid { message: String } => "token rejected: {message}",
        /// The token was valid once but has expired.
        Expired => "token expired",
    }
}

/// Issues signed bearer tokens naming a user, and verifies them.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, user: &UserId) -> Result<AccessToken, TokenError>;

    /// Return the user named by a valid, unexpired token.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
