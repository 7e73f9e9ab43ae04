//! Error types for storage and settings

use thiserror::Error;

/// Storage error type
#[derive(Debug, Error)]
pub enum StorageError {
    /// No per-user data directory on this platform
    #[error("Could not determine data directory")]
    NoDataDir,

    /// Browser storage unavailable or rejected the write
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
