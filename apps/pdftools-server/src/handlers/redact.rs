//! `POST /api/redact-pdf`
//!
//! Pipeline:
//! 1. Draw black rectangles over every requested region
//! 2. Write the staged document into the request workspace
//! 3. Rasterize every page to JPEG with pdftoppm
//! 4. Rebuild a new document from the page images only
//!
//! Step 4 is what makes the redaction real: the returned document contains
//! no text or vector content, so nothing under a cover can be extracted.

use axum::extract::{Multipart, State};
use pdftools_core::{
    assemble_from_jpegs, order_rasters, parse_rules, stage_redactions, RASTER_DPI, RASTER_PREFIX,
};
use tracing::{debug, info};

use super::{attachment, FileResponse, PDF_CONTENT_TYPE};
use crate::binaries::Tool;
use crate::error::ApiError;
use crate::form::ToolForm;
use crate::rasterizer::RasterJob;
use crate::workspace::Workspace;
use crate::AppState;

const STAGED_FILE: &str = "staged.pdf";
const PAGES_DIR: &str = "pages";

/// Handler: POST /api/redact-pdf
pub async fn handle_redact(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<FileResponse, ApiError> {
    let mut form = ToolForm::from_multipart(multipart).await?;
    let upload = form.require_file()?;

    let rules = form.text("redactions").map(parse_rules).unwrap_or_default();
    if rules.is_empty() {
        return Err(ApiError::NoValidRedactions);
    }
    info!(
        "Redaction request: {} bytes, {} rules",
        upload.bytes.len(),
        rules.len()
    );

    let pdftoppm = state.require(Tool::Pdftoppm)?;

    let source = upload.bytes;
    let staged =
        tokio::task::spawn_blocking(move || stage_redactions(&source, &rules)).await??;
    if staged.covers_applied == 0 {
        debug!(
            "No rule targets an existing page (document has {} pages)",
            staged.page_count
        );
        return Err(ApiError::NoValidRedactions);
    }

    let workspace = state.workspace().await?;
    let staged_path = workspace.write(STAGED_FILE, &staged.bytes).await?;
    let pages_dir = workspace.subdir(PAGES_DIR).await?;

    state
        .rasterizer
        .rasterize(RasterJob {
            binary: &pdftoppm,
            input: &staged_path,
            out_dir: &pages_dir,
            prefix: RASTER_PREFIX,
            dpi: RASTER_DPI,
            timeout: state.process_timeout,
        })
        .await?;

    let rasters = order_rasters(Workspace::list_files(&pages_dir).await?, RASTER_PREFIX);
    if rasters.is_empty() {
        return Err(ApiError::Processing(
            "Rasterizer produced no page images".into(),
        ));
    }
    if rasters.len() != staged.page_count as usize {
        return Err(ApiError::Processing(format!(
            "Rasterizer produced {} page images for a {}-page document",
            rasters.len(),
            staged.page_count
        )));
    }

    let mut images = Vec::with_capacity(rasters.len());
    for path in &rasters {
        images.push(tokio::fs::read(path).await?);
    }

    let output = tokio::task::spawn_blocking(move || assemble_from_jpegs(images)).await??;
    info!(
        "Redacted {} pages ({} covers), output {} bytes",
        rasters.len(),
        staged.covers_applied,
        output.len()
    );

    Ok(attachment(output, PDF_CONTENT_TYPE, "redacted.pdf"))
}
