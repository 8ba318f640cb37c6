//! Embedded redb store: opening, table bootstrap, blocking execution and health checks.

mod config;
mod connector;
mod health;

pub use config::EmbeddedConfig;
pub use connector::{ensure_table, open, open_in_memory, open_with_retry, run_blocking};
pub use health::check_health;

// Re-export redb types for convenience
pub use redb::{Database, ReadableTable, TableDefinition};
