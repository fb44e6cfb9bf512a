//! Document logic for the PDF tools backend
//!
//! This crate holds everything the server does to documents in-process,
//! using lopdf:
//! - `redaction`: rule parsing/validation and top-left to PDF-space conversion
//! - `stage`: drawing opaque cover rectangles onto the source document
//! - `raster`: ordering the rasterizer's per-page output
//! - `assemble`: rebuilding an image-only document from page rasters
//! - `text`: plain-text extraction
//!
//! Rasterization itself, encryption and format conversion are done by
//! external binaries driven from the server crate.

pub mod assemble;
pub mod error;
pub mod raster;
pub mod redaction;
pub mod stage;
pub mod text;

pub use assemble::assemble_from_jpegs;
pub use error::PdfToolsError;
pub use raster::{order_rasters, raster_page_number, RASTER_DPI, RASTER_PREFIX};
pub use redaction::{parse_rules, CoverRect, RedactionRule};
pub use stage::{stage_redactions, StagedDocument};
pub use text::extract_text;

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<u32, PdfToolsError> {
    let doc =
        lopdf::Document::load_mem(bytes).map_err(|e| PdfToolsError::ParseError(e.to_string()))?;
    Ok(doc.get_pages().len() as u32)
}
