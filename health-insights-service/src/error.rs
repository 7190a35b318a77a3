use axum::{
    Json,
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::llm::LlmError;

pub const ONLY_PDF_MESSAGE: &str = "Only PDF files are allowed.";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read PDF: {0}")]
    Unreadable(String),
    #[error("Failed to extract text from PDF.")]
    NoText,
}

/// Every handler failure ends up here and is rendered as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Upstream(#[from] LlmError),
    #[error("{0}")]
    Unhandled(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Document(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The upload route reports server-side failures as "An error occurred: ...".
    pub fn into_upload_error(self) -> Self {
        match self {
            ApiError::Validation(_) | ApiError::Document(_) => self,
            other => ApiError::Unhandled(format!("An error occurred: {}", other)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Validation(err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "Request failed");
        } else {
            warn!(status = %status, error = %self, "Request rejected");
        }

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
