//! Driving port for user-record lookups subject to membership visibility.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch `target` as seen by `requester`.
    ///
    /// Fails with `NotFound` when the target does not exist and `Forbidden`
    /// when the two users share no organisation.
    async fn user_record(&self, requester: &UserId, target: &UserId) -> Result<User, Error>;
}
