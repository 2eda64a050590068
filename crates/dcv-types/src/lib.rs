//! Foundation types for the DICOM vault (DCV).
//!
//! Every other DCV crate depends on `dcv-types`.
//!
//! # Key Types
//!
//! - [`FileId`] -- Content-addressed identifier (SHA-256 of the stored bytes)
//! - [`Tag`] -- `(group, element)` key of a dataset attribute

pub mod error;
pub mod file_id;
pub mod tag;

pub use error::TypeError;
pub use file_id::FileId;
pub use tag::Tag;
