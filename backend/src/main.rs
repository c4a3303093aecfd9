//! Tenancy server entry-point: settings, store selection, and the HTTP listener.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr as _};
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use tenancy::inbound::http::health::HealthState;
use tenancy::outbound::persistence::{DbPool, run_pending_migrations};
use tenancy::outbound::security::JwtTokenService;
use tenancy::settings::AppSettings;

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;

    let secret = settings.jwt_secret()?;
    let tokens = JwtTokenService::new(&secret, settings.jwt_issuer(), settings.token_ttl()?);
    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(bind_addr, Arc::new(tokens));

    if let Some(pool_config) = settings.pool_config() {
        run_pending_migrations(pool_config.database_url())
            .await
            .wrap_err("failed to apply database migrations")?;
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "listening");
    server.await?;
    Ok(())
}
