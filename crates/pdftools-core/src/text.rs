//! Plain-text extraction

use crate::error::PdfToolsError;

/// Extract the text layer of a PDF.
///
/// Image-only documents (including redaction output) yield an empty or
/// whitespace-only string.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, PdfToolsError> {
    pdf_extract::extract_text_from_mem(pdf_bytes)
        .map_err(|e| PdfToolsError::ExtractError(e.to_string()))
}
