//! Embedded store test infrastructure
//!
//! Each `TestStore` lives in its own temporary directory, so tests can run in
//! parallel without sharing a file lock.

use database::embedded::{self, Database};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Test store wrapper that ensures proper cleanup
///
/// The store file and its directory are removed when this struct is dropped.
pub struct TestStore {
    dir: PathBuf,
    path: PathBuf,
    db: Option<Arc<Database>>,
}

impl TestStore {
    /// Create a fresh, empty store file
    ///
    /// # Example
    ///
    /// ```no_run
    /// use test_utils::TestStore;
    ///
    /// let store = TestStore::new();
    /// // Pass store.db() to your repository
    /// ```
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("test-store-{}", uuid::Uuid::new_v4()));
        let path = dir.join("store.redb");

        let db = embedded::open(&path).expect("Failed to open test store");
        tracing::debug!(path = %path.display(), "Created test store");

        Self {
            dir,
            path,
            db: Some(Arc::new(db)),
        }
    }

    /// Shared handle to the open store (useful for passing to repositories)
    pub fn db(&self) -> Arc<Database> {
        Arc::clone(self.db.as_ref().expect("Test store is closed"))
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the store and open the same file again.
    ///
    /// Every handle obtained from [`TestStore::db`] must be dropped first, otherwise
    /// the file is still locked and this panics.
    pub fn reopen(&mut self) -> Arc<Database> {
        self.db = None;

        let db = embedded::open(&self.path).expect("Failed to reopen test store");
        let db = Arc::new(db);
        self.db = Some(Arc::clone(&db));
        db
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestStore {
    fn drop(&mut self) {
        self.db = None;
        tracing::debug!("Cleaning up test store");
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
