//! Multi-tenant accounts and organisations backend.
//!
//! Layout follows ports and adapters: [`domain`] holds the entities, services
//! and ports; [`inbound`] exposes them over HTTP; [`outbound`] implements the
//! ports over PostgreSQL, Argon2 and JWT.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI.
pub use doc::ApiDoc;
pub use middleware::Trace;
