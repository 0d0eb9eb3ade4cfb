// Error taxonomy shared by every stage of the summarize pipeline

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

pub const MISSING_UPLOADS_MESSAGE: &str = "Please upload all PDF files.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A slot was missing or had an empty filename
    #[error("{}", MISSING_UPLOADS_MESSAGE)]
    Validation,

    #[error("Invalid upload: {0}")]
    Multipart(String),

    #[error("Upload exceeds the size limit of {limit} bytes.")]
    UploadTooLarge { limit: usize },

    #[error("Failed to extract text from {filename}.")]
    ExtractionEmpty { filename: String },

    #[error("Error processing {filename}: {detail}")]
    Processing { filename: String, detail: String },

    #[error("No summaries generated.")]
    NoSummaries,

    #[error("Failed to build report: {0}")]
    Report(String),

    #[error("Internal error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation | AppError::Multipart(_) => StatusCode::BAD_REQUEST,
            AppError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ExtractionEmpty { .. }
            | AppError::Processing { .. }
            | AppError::NoSummaries
            | AppError::Report(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", body);
        } else {
            warn!(status = status.as_u16(), "{}", body);
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
