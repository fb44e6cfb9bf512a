//! HTTP handlers, one module per tool family

use axum::http::{header, StatusCode};

pub mod convert;
pub mod health;
pub mod qpdf;
pub mod redact;
pub mod text;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const BINARY_CONTENT_TYPE: &str = "application/octet-stream";

/// Response type for handlers that return a file
pub type FileResponse = (StatusCode, [(header::HeaderName, String); 2], Vec<u8>);

/// A downloadable file response
pub fn attachment(bytes: Vec<u8>, content_type: &str, file_name: &str) -> FileResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
}
