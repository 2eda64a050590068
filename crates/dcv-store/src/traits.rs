use dcv_types::FileId;

use crate::error::StoreResult;

/// Content-addressed blob store.
///
/// All implementations must satisfy these invariants:
/// - `save(b)` returns `FileId::of(b)`, always.
/// - `retrieve(save(b))` yields bytes identical to `b`.
/// - Saving the same bytes twice is not an error and changes nothing.
/// - `retrieve` fails with `StoreError::NotFound` for any ID never saved.
/// - All I/O errors are propagated, never silently ignored.
pub trait ContentStore: Send + Sync {
    /// Store `data` and return its content-addressed ID.
    fn save(&self, data: &[u8]) -> StoreResult<FileId>;

    /// Read the blob stored under `id`.
    fn retrieve(&self, id: &FileId) -> StoreResult<Vec<u8>>;

    /// Check whether a blob exists under `id`.
    fn exists(&self, id: &FileId) -> StoreResult<bool>;
}
