//! Parsed DICOM datasets for the DICOM vault.
//!
//! A [`Dataset`] is the request-local, immutable table of elements produced
//! from a stored blob by a [`DatasetParser`]. The shipped parser,
//! [`DicomParser`], binds to the `dicom-object` library; the rest of the
//! workspace only ever sees this crate's own element model.
//!
//! The [`resolver`] module turns user-supplied `"GGGG,EEEE"` text into a
//! [`Tag`](dcv_types::Tag) and looks it up.

pub mod dataset;
pub mod element;
pub mod error;
pub mod parser;
pub mod resolver;
#[cfg(any(test, feature = "test-util"))]
pub mod sample;
pub mod tags;

pub use dataset::Dataset;
pub use element::{Element, ElementValue};
pub use error::{DatasetError, DatasetResult};
pub use parser::{DatasetParser, DicomParser};
pub use resolver::{parse_tag_reference, resolve};
