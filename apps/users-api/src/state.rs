//! Application state shared by the route builders and the readiness check.

use database::embedded::Database;
use std::sync::Arc;

/// Cloned per handler; only `Arc` pointers are copied.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Shared handle to the store file; the router's repositories hold clones
    pub db: Arc<Database>,
}
