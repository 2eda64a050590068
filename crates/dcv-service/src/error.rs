use std::path::PathBuf;

use dcv_dataset::DatasetError;
use dcv_render::RenderError;
use dcv_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("cannot read input file {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write output file {path}: {source}")]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Flat classification of a [`ServiceError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    StorageUnavailable,
    StorageIo,
    NotFound,
    HashMismatch,
    InvalidTagFormat,
    TagNotFound,
    DatasetParse,
    MissingPixelData,
    MissingDimensions,
    InvalidDimensions,
    PixelDataTooShort,
    UnsupportedPixelFormat,
    InputUnreadable,
    OutputUnwritable,
    EncodeFailed,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InputUnreadable { .. } => ErrorKind::InputUnreadable,
            Self::OutputUnwritable { .. } => ErrorKind::OutputUnwritable,
            Self::Store(e) => match e {
                StoreError::StorageUnavailable { .. } => ErrorKind::StorageUnavailable,
                StoreError::NotFound(_) => ErrorKind::NotFound,
                StoreError::HashMismatch { .. } => ErrorKind::HashMismatch,
                StoreError::Io(_) => ErrorKind::StorageIo,
            },
            Self::Dataset(e) => match e {
                DatasetError::Parse(_) => ErrorKind::DatasetParse,
                DatasetError::InvalidTagFormat(_) => ErrorKind::InvalidTagFormat,
                DatasetError::TagNotFound(_) => ErrorKind::TagNotFound,
            },
            Self::Render(e) => match e {
                RenderError::MissingPixelData => ErrorKind::MissingPixelData,
                RenderError::MissingDimensions(_) => ErrorKind::MissingDimensions,
                RenderError::InvalidDimensions { .. } => ErrorKind::InvalidDimensions,
                RenderError::PixelDataTooShort { .. } => ErrorKind::PixelDataTooShort,
                RenderError::UnsupportedPixelFormat(_) => ErrorKind::UnsupportedPixelFormat,
                RenderError::Encode(_) => ErrorKind::EncodeFailed,
            },
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
