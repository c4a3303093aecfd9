//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user and organisation repository ports,
//! backed by `diesel-async` with `bb8` connection pooling.
//!
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Multi-row writes run inside a single transaction.
//! - Database errors are classified once and mapped to port errors.
//!
//! # Example
//!
//! ```no_run
//! use tenancy::outbound::persistence::{
//!     DbPool, DieselOrganisationRepository, DieselUserRepository, PoolConfig,
//! };
//!
//! # async fn build() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/tenancy")).await?;
//! let users = DieselUserRepository::new(pool.clone());
//! let organisations = DieselOrganisationRepository::new(pool);
//! # let _ = (users, organisations);
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_organisation_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_organisation_repository::DieselOrganisationRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
