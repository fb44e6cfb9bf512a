use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfToolsError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Invalid image: {0}")]
    ImageError(String),

    #[error("No pages to assemble")]
    NoPages,

    #[error("Text extraction failed: {0}")]
    ExtractError(String),
}
