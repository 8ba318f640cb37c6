use redb::backends::InMemoryBackend;
use redb::{Database, Key, TableDefinition, TableHandle, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::EmbeddedConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

/// Open (or create) a store file.
///
/// Missing parent directories are created first.
pub fn open(path: impl AsRef<Path>) -> DatabaseResult<Database> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            DatabaseError::ConfigError(format!("cannot create {}: {}", parent.display(), e))
        })?;
    }

    let db = Database::create(path)?;
    info!(path = %path.display(), "Opened embedded store");

    Ok(db)
}

/// Open a store that lives only in memory. Used by tests and local experiments.
pub fn open_in_memory() -> DatabaseResult<Database> {
    let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
    debug!("Opened in-memory store");
    Ok(db)
}

/// Open the store, retrying while another process still holds the file lock.
///
/// Any other failure (bad path, corrupt file) is returned immediately. Uses the
/// config's retry policy unless `retry_config` overrides it.
///
/// # Example
/// ```ignore
/// use database::embedded::{EmbeddedConfig, open_with_retry};
///
/// let db = open_with_retry(EmbeddedConfig::new("users.redb"), None).await?;
/// ```
pub async fn open_with_retry(
    config: EmbeddedConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<Arc<Database>> {
    let retry = retry_config.unwrap_or_else(|| config.retry_config());
    let path = config.path;

    let db = retry_with_backoff(
        || {
            let path = path.clone();
            async move {
                match tokio::task::spawn_blocking(move || open(&path)).await {
                    Ok(result) => result,
                    Err(e) => Err(DatabaseError::TaskFailed(e.to_string())),
                }
            }
        },
        retry,
        DatabaseError::is_locked,
    )
    .await?;

    Ok(Arc::new(db))
}

/// Create `table` if it does not exist yet.
///
/// Read transactions fail on tables that were never created, so services call this
/// once at startup for every table they use.
pub fn ensure_table<K, V>(db: &Database, table: TableDefinition<'_, K, V>) -> DatabaseResult<()>
where
    K: Key + 'static,
    V: Value + 'static,
{
    let txn = db.begin_write()?;
    txn.open_table(table)?;
    txn.commit()?;

    debug!(table = table.name(), "Table ready");
    Ok(())
}

/// Run a store operation on Tokio's blocking pool.
///
/// redb transactions block on file I/O and on the single-writer lock, so async
/// callers hand them off here instead of stalling a runtime worker.
pub async fn run_blocking<F, T>(db: &Arc<Database>, operation: F) -> DatabaseResult<T>
where
    F: FnOnce(&Database) -> DatabaseResult<T> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(db);

    match tokio::task::spawn_blocking(move || operation(&db)).await {
        Ok(result) => result,
        Err(e) => Err(DatabaseError::TaskFailed(e.to_string())),
    }
}
