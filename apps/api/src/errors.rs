use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::hubspot::files::UploadError;
use crate::hubspot::CrmError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Every pipeline stage error converts into this, and `IntoResponse` is the only place
/// they are mapped onto HTTP status codes.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("No text extracted from the file.")]
    EmptyExtraction,

    #[error("Failed to extract text: {0}")]
    ExtractionFailed(String),

    #[error("File upload failed: HubSpot upload failed (status {status}): {body}")]
    UploadFailed { status: u16, body: String },

    #[error("File upload failed: {0}")]
    UploadTransport(String),

    #[error("File uploaded, but URL not returned by HubSpot.")]
    UploadIncomplete,

    #[error("Gemini returned invalid JSON: {0}")]
    InvalidModelOutput(String),

    #[error("AI parsing failed: {0}")]
    Llm(String),

    #[error("HubSpot operation failed: {0}")]
    CrmOperationFailed(String),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedFormat(content_type) => {
                AppError::UnsupportedFormat(content_type)
            }
            ExtractionError::Empty => AppError::EmptyExtraction,
            other => AppError::ExtractionFailed(other.to_string()),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Rejected { status, body } => AppError::UploadFailed { status, body },
            UploadError::MissingUrl => AppError::UploadIncomplete,
            other => AppError::UploadTransport(other.to_string()),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Parse(e) => AppError::InvalidModelOutput(e.to_string()),
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl From<CrmError> for AppError {
    fn from(err: CrmError) -> Self {
        AppError::CrmOperationFailed(err.to_string())
    }
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REQUEST"),
            AppError::UnsupportedFormat(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT"),
            AppError::EmptyExtraction => (StatusCode::BAD_REQUEST, "EMPTY_EXTRACTION"),
            AppError::ExtractionFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "EXTRACTION_FAILED")
            }
            AppError::UploadFailed { .. } | AppError::UploadTransport(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "UPLOAD_FAILED")
            }
            AppError::UploadIncomplete => (StatusCode::INTERNAL_SERVER_ERROR, "UPLOAD_INCOMPLETE"),
            AppError::InvalidModelOutput(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_MODEL_OUTPUT")
            }
            AppError::Llm(_) => (StatusCode::INTERNAL_SERVER_ERROR, "LLM_ERROR"),
            AppError::CrmOperationFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CRM_OPERATION_FAILED")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(code, "{self}");
        } else {
            tracing::warn!(code, "{self}");
        }

        let body = Json(json!({
            "detail": self.to_string(),
            "code": code,
        }));

        (status, body).into_response()
    }
}
