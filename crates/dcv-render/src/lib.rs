//! Grayscale rendering for the DICOM vault.
//!
//! [`extract_raster`] validates a dataset's image attributes and lays its
//! pixel bytes out as a row-major [`Raster`]; [`encode_png`] writes that
//! raster as an 8-bit grayscale PNG. Only uncompressed, single-frame,
//! 8-bit unsigned monochrome images are supported.

pub mod encode;
pub mod error;
pub mod raster;

pub use encode::encode_png;
pub use error::{RenderError, RenderResult};
pub use raster::{extract_raster, Raster};
