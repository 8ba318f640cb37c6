/// Unified error type for store operations
///
/// Every redb error family converts into [`DatabaseError::Embedded`], so blocking store
/// closures can use `?` on transactions, tables and commits alike.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Errors raised by the embedded engine
    #[error("Embedded store error: {0}")]
    Embedded(#[from] redb::Error),

    /// A stored value could not be encoded or decoded
    #[error("Codec error: {0}")]
    Codec(String),

    /// Opening the store failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A blocking store task panicked or was cancelled
    #[error("Blocking task failed: {0}")]
    TaskFailed(String),
}

macro_rules! impl_from_redb {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for DatabaseError {
                fn from(err: $source) -> Self {
                    DatabaseError::Embedded(redb::Error::from(err))
                }
            }
        )+
    };
}

impl_from_redb!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

impl DatabaseError {
    /// True when the store file is held open by another process.
    pub fn is_locked(&self) -> bool {
        matches!(self, DatabaseError::Embedded(redb::Error::DatabaseAlreadyOpen))
    }
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
