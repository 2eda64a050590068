use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dcv_types::FileId;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::ContentStore;

/// Filesystem content store: one flat directory, one file per blob.
///
/// On-disk layout:
/// ```text
/// <root>/
///   <64 lowercase hex digits>   raw blob bytes
///   ...
/// ```
///
/// There is no index and no metadata sidecar. Blobs are written to a
/// temporary file in `root` and renamed into place, so a reader never sees
/// a partially written blob under its final name.
pub struct FsContentStore {
    root: PathBuf,
    config: StoreConfig,
}

impl FsContentStore {
    /// Open (or create) a store rooted at `root` with the default config.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open_with_config(root, StoreConfig::default())
    }

    /// Open (or create) a store rooted at `root`.
    ///
    /// Idempotent. Fails with [`StoreError::StorageUnavailable`] if the
    /// directory cannot be created or `root` exists but is not a directory.
    pub fn open_with_config(root: impl Into<PathBuf>, config: StoreConfig) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::StorageUnavailable {
            path: root.clone(),
            source,
        })?;
        debug!(root = %root.display(), ?config, "content store ready");
        Ok(Self { root, config })
    }

    /// The directory holding the blobs.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Location of the blob for `id` (whether or not it exists).
    pub fn path_of(&self, id: &FileId) -> PathBuf {
        self.root.join(id.to_hex())
    }
}

impl ContentStore for FsContentStore {
    fn save(&self, data: &[u8]) -> StoreResult<FileId> {
        let id = FileId::of(data);
        if !self.config.overwrite_existing && self.exists(&id)? {
            debug!(%id, "blob already stored, skipping write");
            return Ok(id);
        }

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        set_blob_permissions(tmp.as_file())?;
        tmp.persist(self.path_of(&id)).map_err(|e| e.error)?;

        debug!(%id, bytes = data.len(), "blob written");
        Ok(id)
    }

    fn retrieve(&self, id: &FileId) -> StoreResult<Vec<u8>> {
        let data = match fs::read(self.path_of(id)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_hex()))
            }
            Err(e) => return Err(e.into()),
        };

        if self.config.verify_on_read {
            let computed = FileId::of(&data);
            if computed != *id {
                return Err(StoreError::HashMismatch { id: *id, computed });
            }
        }
        Ok(data)
    }

    fn exists(&self, id: &FileId) -> StoreResult<bool> {
        match fs::metadata(self.path_of(id)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Blobs are readable by every local user (0644), not just the owner.
#[cfg(unix)]
fn set_blob_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_blob_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}

impl std::fmt::Debug for FsContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsContentStore")
            .field("root", &self.root)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn temp_store() -> (tempfile::TempDir, FsContentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsContentStore::open(dir.path().join("storage")).unwrap();
        (dir, store)
    }

    // -----------------------------------------------------------------------
    // Initialization
    // -----------------------------------------------------------------------

    #[test]
    fn open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("a").join("b");
        FsContentStore::open(&root).unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn open_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        FsContentStore::open(dir.path()).unwrap();
        FsContentStore::open(dir.path()).unwrap();
    }

    #[test]
    fn open_on_a_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, b"x").unwrap();
        let err = FsContentStore::open(&file).unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable { .. }));
    }

    // -----------------------------------------------------------------------
    // Save / retrieve
    // -----------------------------------------------------------------------

    #[test]
    fn save_writes_blob_named_by_digest() {
        let (_dir, store) = temp_store();
        let id = store.save(b"abc").unwrap();
        assert_eq!(
            id.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(fs::read(store.path_of(&id)).unwrap(), b"abc");
    }

    #[test]
    fn save_twice_keeps_one_blob() {
        let (_dir, store) = temp_store();
        let id1 = store.save(b"duplicate").unwrap();
        let id2 = store.save(b"duplicate").unwrap();
        assert_eq!(id1, id2);
        assert_eq!(fs::read_dir(store.root()).unwrap().count(), 1);
    }

    #[test]
    fn overwrite_existing_rewrites_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            overwrite_existing: true,
            ..Default::default()
        };
        let store = FsContentStore::open_with_config(dir.path(), config).unwrap();
        let id = store.save(b"same").unwrap();
        assert_eq!(store.save(b"same").unwrap(), id);
        assert_eq!(store.retrieve(&id).unwrap(), b"same");
    }

    #[cfg(unix)]
    #[test]
    fn blobs_are_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = temp_store();
        let id = store.save(b"shared").unwrap();
        let mode = fs::metadata(store.path_of(&id)).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn retrieve_unknown_id_is_not_found() {
        let (_dir, store) = temp_store();
        let id = FileId::of(b"never saved");
        let err = store.retrieve(&id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref s) if *s == id.to_hex()));
        assert!(!store.exists(&id).unwrap());
    }

    #[test]
    fn empty_blob_roundtrips() {
        let (_dir, store) = temp_store();
        let id = store.save(b"").unwrap();
        assert!(store.retrieve(&id).unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Verification on read
    // -----------------------------------------------------------------------

    #[test]
    fn tampered_blob_is_returned_without_verification() {
        let (_dir, store) = temp_store();
        let id = store.save(b"original").unwrap();
        fs::write(store.path_of(&id), b"tampered").unwrap();
        assert_eq!(store.retrieve(&id).unwrap(), b"tampered");
    }

    #[test]
    fn tampered_blob_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsContentStore::open_with_config(dir.path(), StoreConfig::verifying()).unwrap();
        let id = store.save(b"original").unwrap();
        assert_eq!(store.retrieve(&id).unwrap(), b"original");

        fs::write(store.path_of(&id), b"tampered").unwrap();
        let err = store.retrieve(&id).unwrap_err();
        match err {
            StoreError::HashMismatch { id: got, computed } => {
                assert_eq!(got, id);
                assert_eq!(computed, FileId::of(b"tampered"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn concurrent_writers_of_same_content() {
        use std::sync::Arc;
        use std::thread;

        let (_dir, store) = temp_store();
        let store = Arc::new(store);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.save(b"racing content").unwrap())
            })
            .collect();

        let ids: Vec<FileId> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.retrieve(&ids[0]).unwrap(), b"racing content");
        assert_eq!(fs::read_dir(store.root()).unwrap().count(), 1);
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn save_is_deterministic_and_roundtrips(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let (_dir, store) = temp_store();
            let id = store.save(&data).unwrap();
            prop_assert_eq!(id, FileId::of(&data));
            prop_assert_eq!(store.retrieve(&id).unwrap(), data.clone());

            // idempotent
            prop_assert_eq!(store.save(&data).unwrap(), id);
            prop_assert_eq!(store.retrieve(&id).unwrap(), data);
        }
    }
}
