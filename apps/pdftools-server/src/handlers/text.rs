//! Text endpoints: embedded text extraction and OCR

use std::ffi::OsString;

use axum::extract::{Multipart, State};
use axum::Json;
use pdftools_core::extract_text;
use serde::Serialize;
use tracing::info;

use crate::binaries::Tool;
use crate::error::ApiError;
use crate::form::ToolForm;
use crate::process;
use crate::AppState;

/// Extension used when the uploaded image has no usable one
const DEFAULT_IMAGE_EXT: &str = "png";

#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub text: String,
}

/// Handler: POST /api/pdf-to-text
pub async fn handle_pdf_to_text(multipart: Multipart) -> Result<Json<TextResponse>, ApiError> {
    let mut form = ToolForm::from_multipart(multipart).await?;
    let upload = form.require_file()?;
    info!("Text extraction request: {} bytes", upload.bytes.len());

    let bytes = upload.bytes;
    let text = tokio::task::spawn_blocking(move || extract_text(&bytes)).await??;

    Ok(Json(TextResponse { text }))
}

/// Handler: POST /api/ocr
pub async fn handle_ocr(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TextResponse>, ApiError> {
    let mut form = ToolForm::from_multipart(multipart).await?;
    let upload = form.require_file()?;
    info!("OCR request: {} bytes", upload.bytes.len());

    let tesseract = state.require(Tool::Tesseract)?;
    let workspace = state.workspace().await?;

    let ext = upload
        .extension()
        .unwrap_or_else(|| DEFAULT_IMAGE_EXT.to_string());
    let input_path = workspace
        .write(&format!("input.{}", ext), &upload.bytes)
        .await?;

    let args: Vec<OsString> = vec![input_path.into(), "stdout".into()];
    let output = process::run(Tool::Tesseract, &tesseract, &args, state.process_timeout).await?;
    process::check_status(Tool::Tesseract, &output, &[])?;

    Ok(Json(TextResponse {
        text: String::from_utf8_lossy(&output.stdout).trim().to_string(),
    }))
}
