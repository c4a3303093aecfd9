//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod envelope;
pub mod error;
pub mod health;
pub mod organisations;
pub mod routes;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
