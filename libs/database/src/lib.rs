//! Database library providing the embedded key-value store used by the services
//!
//! The store is [redb](https://docs.rs/redb): a single-file, ordered, transactional
//! key-value engine with one writer and many concurrent readers. This crate owns
//! opening the file (with retry while another process holds the lock), creating
//! tables, running blocking store work off the async runtime, and health checks.
//!
//! # Features
//!
//! - `config` - Configuration support with `core_config::FromEnv`
//!
//! # Examples
//!
//! ```ignore
//! use database::embedded::{self, EmbeddedConfig};
//! use redb::TableDefinition;
//!
//! const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");
//!
//! let db = embedded::open_with_retry(EmbeddedConfig::new("./data/users.redb"), None).await?;
//! embedded::ensure_table(&db, USERS)?;
//! ```
//!
//! Tests can use an in-memory store with the same API:
//!
//! ```ignore
//! let db = std::sync::Arc::new(database::embedded::open_in_memory()?);
//! ```

pub mod common;
pub mod embedded;

// Re-exports for convenience
pub use common::{DatabaseError, DatabaseResult};
