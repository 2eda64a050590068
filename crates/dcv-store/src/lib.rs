//! Content-addressed blob storage for the DICOM vault.
//!
//! Every uploaded file is stored as an immutable blob named by the SHA-256
//! digest of its bytes. Uploading the same content twice yields the same
//! [`FileId`](dcv_types::FileId) and a single stored blob.
//!
//! # Storage Backends
//!
//! All backends implement the [`ContentStore`] trait:
//!
//! - [`FsContentStore`] -- flat directory, one file per blob
//! - [`InMemoryContentStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Blobs are immutable once written (content-addressing guarantees this).
//! 2. Concurrent writers of the same ID write identical bytes; no locking.
//! 3. The store never interprets blob contents.
//! 4. All I/O errors are propagated, never retried or silently ignored.

pub mod config;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use fs::FsContentStore;
pub use memory::InMemoryContentStore;
pub use traits::ContentStore;
