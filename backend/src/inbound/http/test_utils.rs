//! Test helpers for inbound HTTP components.

use std::sync::Arc;
use std::time::Duration;

use crate::outbound::memory::InMemoryDirectory;
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService, PasswordConfig};

use super::state::HttpState;

const TEST_SECRET: &[u8] = b"http-test-secret";

/// Token service sharing the secret used by [`test_state`].
pub fn test_tokens() -> JwtTokenService {
    JwtTokenService::new(TEST_SECRET, "tenancy", Duration::from_secs(300))
}

/// State over a fresh in-memory directory with cheap Argon2 parameters.
pub fn test_state() -> HttpState {
    let directory = Arc::new(InMemoryDirectory::default());
    HttpState::from_adapters(
        directory.clone(),
        directory,
        Arc::new(Argon2PasswordHasher::new(PasswordConfig::fast())),
        Arc::new(test_tokens()),
    )
}
