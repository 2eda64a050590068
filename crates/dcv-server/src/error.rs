use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use dcv_service::{ErrorKind, ServiceError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// No credentials were presented.
    #[error("Unauthorized")]
    Unauthorized,

    /// Credentials were presented but are not recognized.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    Forbidden { identity: String, action: String },

    #[error("{0}")]
    BadRequest(String),

    /// The multipart body could not be read; carries axum's status, e.g.
    /// 413 when the body exceeds the upload limit.
    #[error("{message}")]
    Multipart { status: StatusCode, message: String },

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Multipart { status, .. } => *status,
            Self::Service(e) => match e.kind() {
                ErrorKind::NotFound | ErrorKind::TagNotFound => StatusCode::NOT_FOUND,
                ErrorKind::InvalidTagFormat => StatusCode::BAD_REQUEST,
                ErrorKind::DatasetParse
                | ErrorKind::MissingPixelData
                | ErrorKind::MissingDimensions
                | ErrorKind::InvalidDimensions
                | ErrorKind::PixelDataTooShort
                | ErrorKind::UnsupportedPixelFormat => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<MultipartError> for ServerError {
    fn from(e: MultipartError) -> Self {
        Self::Multipart {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
