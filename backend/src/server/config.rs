//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use tenancy::domain::ports::{PasswordHasher, TokenService};
use tenancy::outbound::persistence::DbPool;
use tenancy::outbound::security::{Argon2PasswordHasher, PasswordConfig};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: Arc<dyn TokenService>,
    pub(crate) hasher: Arc<dyn PasswordHasher>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Configuration with production Argon2 costs and no database.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: Arc<dyn TokenService>) -> Self {
        Self {
            bind_addr,
            tokens,
            hasher: Arc::new(Argon2PasswordHasher::new(PasswordConfig::default())),
            db_pool: None,
        }
    }

    /// Use Diesel-backed repositories instead of the in-memory directory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg_attr(not(test), expect(dead_code, reason = "tests swap in cheap hashing"))]
    #[must_use]
    pub fn with_password_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = hasher;
        self
    }
}
