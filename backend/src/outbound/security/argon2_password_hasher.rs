//! Argon2id adapter for the [`PasswordHasher`] port.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordConfig {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Iterations.
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    /// 19 MiB, two iterations, one lane.
    fn default() -> Self {
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl PasswordConfig {
    /// Minimal costs for tests. Never use in production.
    pub fn fast() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

/// Hashes passwords with Argon2id on the blocking thread pool.
///
/// # Examples
/// ```
/// use tenancy::outbound::security::{Argon2PasswordHasher, PasswordConfig};
///
/// let hasher = Argon2PasswordHasher::new(PasswordConfig::fast());
/// # let _ = hasher;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    config: PasswordConfig,
}

impl Argon2PasswordHasher {
    pub fn new(config: PasswordConfig) -> Self {
        Self { config }
    }

    fn argon2(config: PasswordConfig) -> Result<Argon2<'static>, PasswordHasherError> {
        let params = Params::new(
            config.memory_cost,
            config.time_cost,
            config.parallelism,
            None,
        )
        .map_err(|err| PasswordHasherError::hash(format!("invalid argon2 parameters: {err}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn hash_blocking(
        config: PasswordConfig,
        password: &[u8],
    ) -> Result<PasswordHash, PasswordHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        Self::argon2(config)?
            .hash_password(password, &salt)
            .map(|phc| PasswordHash::new(phc.to_string()))
            .map_err(|err| PasswordHasherError::hash(err.to_string()))
    }

    fn verify_blocking(password: &[u8], stored: &str) -> Result<bool, PasswordHasherError> {
        let parsed =
            PhcString::new(stored).map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))?;
        // Parameters come from the PHC string, not from the current config.
        Ok(Argon2::default()
            .verify_password(password, &parsed)
            .is_ok())
    }
}

fn join_error(err: tokio::task::JoinError) -> PasswordHasherError {
    PasswordHasherError::hash(format!("hashing task failed: {err}"))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let config = self.config;
        let password = Zeroizing::new(password.as_bytes().to_vec());
        tokio::task::spawn_blocking(move || Self::hash_blocking(config, &password))
            .await
            .map_err(join_error)?
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let password = Zeroizing::new(password.as_bytes().to_vec());
        let stored = hash.as_str().to_owned();
        tokio::task::spawn_blocking(move || Self::verify_blocking(&password, &stored))
            .await
            .map_err(join_error)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new(PasswordConfig::fast())
    }

    #[rstest]
    #[tokio::test]
    async fn hash_is_argon2id_phc(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash("correct horse").await.expect("hash");
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(!hash.as_str().contains("correct horse"));
    }

    #[rstest]
    #[tokio::test]
    async fn verify_accepts_only_the_original_password(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash("correct horse").await.expect("hash");

        assert!(hasher.verify("correct horse", &hash).await.expect("verify"));
        assert!(!hasher.verify("battery staple", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn same_password_gets_distinct_salts(hasher: Argon2PasswordHasher) {
        let first = hasher.hash("pw").await.expect("hash");
        let second = hasher.hash("pw").await.expect("hash");
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_hash_is_reported(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify("pw", &PasswordHash::new("not-a-phc-string"))
            .await
            .expect_err("malformed");
        assert!(matches!(err, PasswordHasherError::MalformedHash { .. }));
    }
}
