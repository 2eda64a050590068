use dcv_types::Tag;
use thiserror::Error;

/// Errors from parsing datasets and resolving tags.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    /// The bytes could not be parsed as a dataset.
    #[error("failed to parse dataset: {0}")]
    Parse(String),

    /// The tag text is not `"GGGG,EEEE"` with 16-bit hex fields.
    #[error("invalid tag format: {0}")]
    InvalidTagFormat(String),

    /// The dataset has no element with the requested tag.
    #[error("tag {0} not found in dataset")]
    TagNotFound(Tag),
}

pub type DatasetResult<T> = Result<T, DatasetError>;
