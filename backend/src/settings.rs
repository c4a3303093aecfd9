//! Application settings loaded via OrthoConfig.
//!
//! Values come from `TENANCY_*` environment variables, CLI flags, or a config
//! file. Every key has a default except the JWT secret, which release builds
//! require.

use std::net::SocketAddr;
use std::time::Duration;

use argon2::password_hash::rand_core::{OsRng, RngCore as _};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroizing;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ISSUER: &str = "tenancy";
const DEFAULT_TOKEN_TTL_MINUTES: u64 = 60;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const EPHEMERAL_SECRET_LEN: usize = 32;

/// Problems turning raw settings into usable values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    #[error("TENANCY_JWT_SECRET must be set")]
    MissingSecret,
    #[error("TENANCY_TOKEN_TTL_MINUTES must be positive")]
    ZeroTokenTtl,
    #[error("TENANCY_TOKEN_TTL_MINUTES is too large: {minutes}")]
    TokenTtlTooLarge { minutes: u64 },
}

/// Raw server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TENANCY")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without one the server keeps data in memory.
    pub database_url: Option<String>,
    /// HMAC secret for signing access tokens.
    pub jwt_secret: Option<String>,
    pub jwt_issuer: Option<String>,
    pub token_ttl_minutes: Option<u64>,
    pub pool_max_size: Option<u32>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Pool settings when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref().filter(|url| !url.trim().is_empty())?;
        Some(
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)),
        )
    }

    pub fn jwt_issuer(&self) -> &str {
        self.jwt_issuer.as_deref().unwrap_or(DEFAULT_ISSUER)
    }

    pub fn token_ttl(&self) -> Result<Duration, SettingsError> {
        match self.token_ttl_minutes.unwrap_or(DEFAULT_TOKEN_TTL_MINUTES) {
            0 => Err(SettingsError::ZeroTokenTtl),
            minutes => minutes
                .checked_mul(60)
                .map(Duration::from_secs)
                .ok_or(SettingsError::TokenTtlTooLarge { minutes }),
        }
    }

    /// Signing secret bytes.
    ///
    /// Debug builds fall back to a random per-process secret, so tokens stop
    /// verifying after a restart.
    pub fn jwt_secret(&self) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        self.configured_secret()
            .map_or_else(|| fallback_secret(cfg!(debug_assertions)), Ok)
    }

    fn configured_secret(&self) -> Option<Zeroizing<Vec<u8>>> {
        self.jwt_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(|secret| Zeroizing::new(secret.as_bytes().to_vec()))
    }
}

fn fallback_secret(allow_ephemeral: bool) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
    if !allow_ephemeral {
        return Err(SettingsError::MissingSecret);
    }
    warn!("TENANCY_JWT_SECRET unset; using an ephemeral signing secret (dev only)");
    let mut bytes = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
    OsRng.fill_bytes(&mut bytes);
    Ok(bytes)
}
