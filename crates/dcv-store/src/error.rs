use std::path::PathBuf;

use dcv_types::FileId;

/// Errors from content store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing location could not be created or is not usable.
    #[error("storage unavailable at {path:?}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No blob is stored under the requested ID.
    #[error("file not found: {0}")]
    NotFound(String),

    /// Content hash mismatch on read (data corruption).
    #[error("hash mismatch for {id}: stored content hashes to {computed}")]
    HashMismatch { id: FileId, computed: FileId },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
