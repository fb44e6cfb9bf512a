//! Page rasterization seam
//!
//! The redaction handler only needs "turn this PDF into one JPEG per page in
//! that directory". Production uses `pdftoppm`; tests plug in a fake.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::binaries::Tool;
use crate::error::ApiError;
use crate::process;

/// One rasterization request
#[derive(Debug, Clone, Copy)]
pub struct RasterJob<'a> {
    /// Resolved rasterizer executable
    pub binary: &'a Path,
    pub input: &'a Path,
    /// Directory the page images are written to
    pub out_dir: &'a Path,
    /// Images are named `<prefix>-<page>.jpg`
    pub prefix: &'a str,
    pub dpi: u32,
    pub timeout: Option<Duration>,
}

#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, job: RasterJob<'_>) -> Result<(), ApiError>;
}

/// Rasterizer backed by poppler's `pdftoppm`
#[derive(Debug, Default, Clone, Copy)]
pub struct Pdftoppm;

impl Pdftoppm {
    pub fn args(job: &RasterJob<'_>) -> Vec<OsString> {
        vec![
            "-jpeg".into(),
            "-r".into(),
            job.dpi.to_string().into(),
            job.input.into(),
            job.out_dir.join(job.prefix).into(),
        ]
    }
}

#[async_trait]
impl Rasterizer for Pdftoppm {
    async fn rasterize(&self, job: RasterJob<'_>) -> Result<(), ApiError> {
        let output =
            process::run(Tool::Pdftoppm, job.binary, &Self::args(&job), job.timeout).await?;
        process::check_status(Tool::Pdftoppm, &output, &[])
    }
}
