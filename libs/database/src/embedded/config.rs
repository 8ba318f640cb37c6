use std::path::{Path, PathBuf};

use crate::common::RetryConfig;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse, env_required};

/// Embedded store configuration
///
/// # Example
///
/// ```ignore
/// use database::embedded::EmbeddedConfig;
///
/// let config = EmbeddedConfig::new("./data/users.redb");
///
/// // From environment variables (requires `config` feature)
/// let config = EmbeddedConfig::from_env()?;
/// ```
#[derive(Clone, Debug)]
pub struct EmbeddedConfig {
    /// Path of the store file; created together with missing parent directories
    pub path: PathBuf,

    /// How many times to retry while another process holds the file lock
    pub open_max_retries: u32,
}

impl EmbeddedConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            open_max_retries: 3,
        }
    }

    pub fn with_open_max_retries(mut self, retries: u32) -> Self {
        self.open_max_retries = retries;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Retry policy derived from this config
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new().with_max_retries(self.open_max_retries)
    }
}

/// Load EmbeddedConfig from environment variables
///
/// - `DATABASE_PATH` (required) - store file path
/// - `DB_OPEN_MAX_RETRIES` (optional, default: 3)
#[cfg(feature = "config")]
impl FromEnv for EmbeddedConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let path = env_required("DATABASE_PATH")?;
        let open_max_retries = env_parse("DB_OPEN_MAX_RETRIES", "3")?;

        Ok(Self {
            path: PathBuf::from(path),
            open_max_retries,
        })
    }
}
