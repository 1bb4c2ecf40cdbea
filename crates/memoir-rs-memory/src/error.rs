//! Error types for memory operations.

/// Errors returned by conversation memory and its stores.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// Caller supplied an unusable argument (empty user id, unknown role).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// SQLite error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored record could not be decoded.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}
