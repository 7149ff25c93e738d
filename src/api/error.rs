use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::PipelineError;

pub const EMPTY_FILE: &str = "Empty file uploaded";
pub const UNSUPPORTED_FILE: &str = "Unsupported file type. Upload JPG, PNG, or PDF.";
pub const INVALID_JSON: &str = "Model did not return valid JSON";
pub const DOCUMENT_NOT_FOUND: &str = "document_id not found";
pub const EXTRACTION_ERROR_PREFIX: &str = "OpenAI extraction error: ";
pub const QA_ERROR_PREFIX: &str = "OpenAI QA error: ";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// HTTP-facing error carrying the status and the client message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Maps a failure of `POST /extract`.
    pub fn from_extraction(error: PipelineError) -> Self {
        match error {
            PipelineError::EmptyInput => ApiError::BadRequest(EMPTY_FILE.to_string()),
            PipelineError::UnsupportedMedia(_) => ApiError::BadRequest(UNSUPPORTED_FILE.to_string()),
            PipelineError::Upstream(detail) | PipelineError::InvalidImage(detail) => {
                ApiError::Internal(format!("{}{}", EXTRACTION_ERROR_PREFIX, detail))
            }
            PipelineError::MalformedOutput => ApiError::Internal(INVALID_JSON.to_string()),
            PipelineError::NotFound(_) => ApiError::NotFound(DOCUMENT_NOT_FOUND.to_string()),
        }
    }

    /// Maps a failure of `POST /ask`.
    pub fn from_question(error: PipelineError) -> Self {
        match error {
            PipelineError::NotFound(_) => ApiError::NotFound(DOCUMENT_NOT_FOUND.to_string()),
            PipelineError::Upstream(detail) => ApiError::Internal(format!("{}{}", QA_ERROR_PREFIX, detail)),
            other => ApiError::Internal(format!("{}{}", QA_ERROR_PREFIX, other)),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();

        if status.is_server_error() {
            tracing::error!(%status, %detail, "request failed");
        } else {
            tracing::info!(%status, %detail, "request rejected");
        }

        (status, Json(ErrorBody { detail })).into_response()
    }
}
