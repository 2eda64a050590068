use serde::{Deserialize, Serialize};

/// Behavior switches for a [`ContentStore`](crate::ContentStore) backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Re-hash blobs on retrieve and fail with
    /// [`StoreError::HashMismatch`](crate::StoreError::HashMismatch) when the
    /// content no longer matches its ID.
    pub verify_on_read: bool,
    /// Rewrite a blob even when one already exists under its ID. The result
    /// is identical either way; `false` skips the redundant write.
    pub overwrite_existing: bool,
}

impl StoreConfig {
    /// Configuration that verifies every read.
    pub fn verifying() -> Self {
        Self {
            verify_on_read: true,
            ..Default::default()
        }
    }
}
