//! Error types for the PDF tools server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdftools_core::PdfToolsError;
use serde::Serialize;
use thiserror::Error;

use crate::binaries::Tool;

/// Server error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required form field is absent or unusable
    #[error("{0}")]
    MissingInput(String),

    #[error("No valid redactions were supplied")]
    NoValidRedactions,

    #[error("{} is not installed on this server", .0.display_name())]
    MissingDependency(Tool),

    #[error("{0}")]
    Processing(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput(_) | ApiError::NoValidRedactions => StatusCode::BAD_REQUEST,
            ApiError::MissingDependency(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected ({}): {}", status.as_u16(), self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<PdfToolsError> for ApiError {
    fn from(err: PdfToolsError) -> Self {
        ApiError::Processing(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Processing(format!("I/O error: {}", err))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Processing(format!("Worker task failed: {}", err))
    }
}
