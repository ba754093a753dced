//! Shared cluster handle, migration template, and per-test databases.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use uuid::Uuid;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const TEMPLATE_PREFIX: &str = "community_template";
const RETRIES: usize = 5;
const RETRY_DELAY: Duration = Duration::from_millis(500);

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn retry<T>(what: &str, mut attempt: impl FnMut() -> Result<T, String>) -> Result<T, String> {
    let mut last_error = String::new();
    for round in 1..=RETRIES {
        match attempt() {
            Ok(value) => return Ok(value),
            Err(error) => last_error = format!("{what}: attempt {round}/{RETRIES}: {error}"),
        }
        if round < RETRIES {
            std::thread::sleep(RETRY_DELAY);
        }
    }
    Err(last_error)
}

/// The process-wide embedded cluster, started on first use.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    retry("start cluster", || {
        shared_cluster_handle().map_err(|error| format!("{error:?}"))
    })
}

/// Template name keyed by a hash of the migrations directory, so schema
/// changes get a fresh template.
fn template_name() -> Result<String, String> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(dir).map_err(|error| format!("hash migrations: {error}"))?;
    let short = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_PREFIX}_{short}"))
}

fn migrate(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|error| format!("connect: {error}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|error| format!("migrate: {error}"))?;
    Ok(())
}

fn ensure_template(cluster: &ClusterHandle) -> Result<String, String> {
    let name = template_name()?;
    let _guard = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let exists = cluster
        .database_exists(name.as_str())
        .map_err(|error| format!("template check: {error:?}"))?;
    if !exists {
        cluster
            .create_database(name.as_str())
            .map_err(|error| format!("create template: {error:?}"))?;
        migrate(&cluster.connection().database_url(&name))?;
    }
    Ok(name)
}

/// A migrated database private to the calling test; dropped with the
/// returned handle.
pub fn provision_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    retry("provision database", || {
        let template = ensure_template(cluster)?;
        let name = format!("test_{}", Uuid::new_v4().simple());
        cluster
            .temporary_database_from_template(name.as_str(), template.as_str())
            .map_err(|error| format!("clone template: {error:?}"))
    })
}
