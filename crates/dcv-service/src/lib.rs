//! Service facade for the DICOM vault.
//!
//! [`DicomService`] is the single entry point the HTTP and CLI front ends
//! call. Each operation is a straight-line composition of the store, the
//! dataset parser, the tag resolver and the pixel renderer; nothing is
//! retried and no error is downgraded to a default value.

pub mod error;
pub mod service;

pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use service::{DicomService, FsDicomService};

// Re-export key types
pub use dcv_dataset::{Dataset, DatasetParser, DicomParser};
pub use dcv_store::{ContentStore, FsContentStore, InMemoryContentStore, StoreConfig};
pub use dcv_types::{FileId, Tag};
