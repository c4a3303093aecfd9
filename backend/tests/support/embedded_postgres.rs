//! Embedded PostgreSQL bootstrap for integration tests.
//!
//! One cluster is shared per test binary. Each test gets a fresh database
//! cloned from a template that already carries the embedded migrations, keyed
//! by a hash of the migrations directory so schema edits invalidate it.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tenancy::domain::ports::UserRepositoryError;
use uuid::Uuid;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "tenancy_template";
const SHARED_CLUSTER_RETRIES: usize = 5;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Returns the process-wide embedded cluster, retrying transient bootstrap
/// failures.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= SHARED_CLUSTER_RETRIES => return Err(format!("{error:?}")),
            Err(_) => {
                std::thread::sleep(RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Pins `PG_PASSWORD` so a reused data directory keeps accepting logins.
///
/// `postgresql_embedded` otherwise picks a random password per process while
/// `initdb` only runs on the first.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster bootstrap spawns any threads.
        unsafe {
            std::env::set_var("PG_PASSWORD", "tenancy_embedded_test");
        }
    }
}

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, UserRepositoryError> {
    let hash = hash_directory(migrations_dir())
        .map_err(|err| UserRepositoryError::query(format!("hash migrations: {err}")))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// Creates or reuses the migrated template database.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, UserRepositoryError> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| UserRepositoryError::query(format!("template check: {err:?}")))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| UserRepositoryError::query(format!("create template: {err:?}")))?;
        let url = cluster.connection().database_url(&template_name);
        migrate_schema(&url)?;
    }
    Ok(template_name)
}

/// Provisions a temporary database cloned from the migration template.
///
/// The database is dropped when the returned handle goes out of scope.
pub fn provision_template_database(
    cluster: &ClusterHandle,
) -> Result<TemporaryDatabase, UserRepositoryError> {
    let mut last_error = None;
    for attempt in 1..=SHARED_CLUSTER_RETRIES {
        let provisioned = ensure_template_database(cluster).and_then(|template| {
            cluster
                .temporary_database_from_template(
                    format!("test_{}", Uuid::new_v4()).as_str(),
                    template.as_str(),
                )
                .map_err(|err| {
                    UserRepositoryError::query(format!(
                        "create database from template: attempt {attempt}: {err:?}"
                    ))
                })
        });
        match provisioned {
            Ok(database) => return Ok(database),
            Err(error) => last_error = Some(error),
        }
        if attempt < SHARED_CLUSTER_RETRIES {
            std::thread::sleep(RETRY_DELAY);
        }
    }
    Err(last_error.unwrap_or_else(|| UserRepositoryError::query("template retries exhausted")))
}

/// Runs every embedded migration against `url`.
pub fn migrate_schema(url: &str) -> Result<(), UserRepositoryError> {
    let mut conn = PgConnection::establish(url)
        .map_err(|err| UserRepositoryError::connection(format!("{err:?}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| UserRepositoryError::query(format!("migration: {err:?}")))?;
    Ok(())
}
