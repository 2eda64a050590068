use dcv_types::Tag;
use thiserror::Error;

/// Errors from turning a dataset into an image.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No non-empty native pixel data element.
    #[error("dataset has no pixel data")]
    MissingPixelData,

    /// Rows or Columns is absent or not an integer.
    #[error("missing image dimension {0}")]
    MissingDimensions(Tag),

    #[error("invalid image dimensions: {rows} rows x {columns} columns")]
    InvalidDimensions { rows: i64, columns: i64 },

    #[error("pixel data too short: need {expected} bytes, have {actual}")]
    PixelDataTooShort { expected: usize, actual: usize },

    #[error("unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

pub type RenderResult<T> = Result<T, RenderError>;
