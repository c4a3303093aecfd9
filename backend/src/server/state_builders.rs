//! Adapter selection for the shared HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use tenancy::domain::ports::{OrganisationRepository, UserRepository};
use tenancy::inbound::http::state::HttpState;
use tenancy::outbound::memory::InMemoryDirectory;
use tenancy::outbound::persistence::{DbPool, DieselOrganisationRepository, DieselUserRepository};

use super::ServerConfig;

type Repositories = (Arc<dyn UserRepository>, Arc<dyn OrganisationRepository>);

/// Diesel repositories when a pool is configured, otherwise one in-memory
/// directory serving both ports.
fn build_repositories(pool: Option<&DbPool>) -> Repositories {
    match pool {
        Some(pool) => {
            info!(store = "postgres", "directory store selected");
            (
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselOrganisationRepository::new(pool.clone())),
            )
        }
        None => {
            warn!(
                store = "memory",
                "TENANCY_DATABASE_URL unset; data will not survive a restart"
            );
            let directory = Arc::new(InMemoryDirectory::default());
            (directory.clone(), directory)
        }
    }
}

pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let (users, organisations) = build_repositories(config.db_pool.as_ref());
    web::Data::new(HttpState::from_adapters(
        users,
        organisations,
        config.hasher.clone(),
        config.tokens.clone(),
    ))
}
