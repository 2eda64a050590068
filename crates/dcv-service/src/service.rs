use std::fs;
use std::path::{Path, PathBuf};

use dcv_dataset::{parse_tag_reference, resolve, Dataset, DatasetParser, DicomParser};
use dcv_render::{encode_png, extract_raster};
use dcv_store::{ContentStore, FsContentStore, StoreConfig, StoreError};
use dcv_types::FileId;
use tracing::{debug, info};

use crate::error::{ServiceError, ServiceResult};

/// The service over the on-disk store and the DICOM parser.
pub type FsDicomService = DicomService<FsContentStore, DicomParser>;

/// High-level DICOM vault API.
///
/// Stateless apart from the store; safe to share behind an `Arc` and call
/// from many threads at once.
pub struct DicomService<S, P> {
    store: S,
    parser: P,
}

impl FsDicomService {
    /// Open the filesystem store at `root` and pair it with [`DicomParser`].
    pub fn open(root: impl Into<PathBuf>, config: StoreConfig) -> ServiceResult<Self> {
        let store = FsContentStore::open_with_config(root, config)?;
        Ok(Self::new(store, DicomParser::new()))
    }
}

impl<S: ContentStore, P: DatasetParser> DicomService<S, P> {
    pub fn new(store: S, parser: P) -> Self {
        Self { store, parser }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ---- Ingest ----

    /// Read the file at `path` and store its bytes.
    pub fn ingest(&self, path: impl AsRef<Path>) -> ServiceResult<FileId> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| ServiceError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        self.ingest_bytes(&data)
    }

    /// Store `data` as received. The content is not validated as DICOM.
    pub fn ingest_bytes(&self, data: &[u8]) -> ServiceResult<FileId> {
        let id = self.store.save(data)?;
        info!(%id, bytes = data.len(), "file ingested");
        Ok(id)
    }

    // ---- Reads ----

    /// Resolve `tag_text` (`"GGGG,EEEE"`) in the stored file `id_text`.
    ///
    /// The file is retrieved and parsed before the tag text is checked, so
    /// an unknown ID wins over a malformed tag.
    pub fn get_attribute(&self, id_text: &str, tag_text: &str) -> ServiceResult<String> {
        let dataset = self.load(id_text)?;
        let tag = parse_tag_reference(tag_text)?;
        let value = resolve(&dataset, tag)?;
        debug!(id = id_text, %tag, "attribute resolved");
        Ok(value)
    }

    /// Render the stored file `id_text` as PNG bytes.
    pub fn convert_to_image(&self, id_text: &str) -> ServiceResult<Vec<u8>> {
        let dataset = self.load(id_text)?;
        let raster = extract_raster(&dataset)?;
        let png = encode_png(&raster)?;
        debug!(id = id_text, bytes = png.len(), "image rendered");
        Ok(png)
    }

    /// Render the stored file `id_text` and write the PNG to `dest`.
    pub fn convert_to_path(&self, id_text: &str, dest: impl AsRef<Path>) -> ServiceResult<PathBuf> {
        let png = self.convert_to_image(id_text)?;
        let dest = dest.as_ref();
        fs::write(dest, &png).map_err(|source| ServiceError::OutputUnwritable {
            path: dest.to_path_buf(),
            source,
        })?;
        Ok(dest.to_path_buf())
    }

    /// Retrieve and parse a stored file.
    ///
    /// `save` only hands out 64 lowercase hex digits. Any other text,
    /// including the upper-case spelling of a stored ID, is not found.
    pub fn load(&self, id_text: &str) -> ServiceResult<Dataset> {
        let not_found = || StoreError::NotFound(id_text.to_string());
        if !FileId::is_canonical_hex(id_text) {
            return Err(not_found().into());
        }
        let id = FileId::from_hex(id_text).map_err(|_| not_found())?;
        let bytes = self.store.retrieve(&id)?;
        Ok(self.parser.parse(&bytes)?)
    }
}

impl<S, P> std::fmt::Debug for DicomService<S, P>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DicomService")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
