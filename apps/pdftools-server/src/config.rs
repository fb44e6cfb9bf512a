//! Server configuration
//!
//! Every setting can be given as a flag or through the environment (a `.env`
//! file is loaded first by `main`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::binaries::Tool;

/// Command-line arguments for the PDF tools server
#[derive(Parser, Debug, Clone)]
#[command(name = "pdftools-server")]
#[command(about = "Backend for the browser PDF tools: redaction, qpdf and LibreOffice endpoints")]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3001")]
    pub port: u16,

    /// Explicit path to qpdf
    #[arg(long, env = "QPDF_PATH")]
    pub qpdf_path: Option<PathBuf>,

    /// Explicit path to soffice/libreoffice
    #[arg(long, env = "LIBREOFFICE_PATH")]
    pub libreoffice_path: Option<PathBuf>,

    /// Explicit path to pdftoppm
    #[arg(long, env = "PDFTOPPM_PATH")]
    pub pdftoppm_path: Option<PathBuf>,

    /// Explicit path to tesseract
    #[arg(long, env = "TESSERACT_PATH")]
    pub tesseract_path: Option<PathBuf>,

    /// Origins allowed to call the API, comma separated (empty allows all)
    #[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Maximum request body size in megabytes
    #[arg(long, env = "MAX_UPLOAD_MB", default_value = "50")]
    pub max_upload_mb: usize,

    /// Rate limit: requests per second per IP
    #[arg(long, env = "RATE_LIMIT", default_value = "10")]
    pub rate_limit: u32,

    /// Kill external tools that run longer than this (unset: no limit)
    #[arg(long, env = "PROCESS_TIMEOUT_SECS")]
    pub process_timeout_secs: Option<u64>,

    /// Directory under which per-request scratch directories are created
    #[arg(long, env = "TEMP_ROOT")]
    pub temp_root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn binary_overrides(&self) -> HashMap<Tool, PathBuf> {
        [
            (Tool::Qpdf, &self.qpdf_path),
            (Tool::LibreOffice, &self.libreoffice_path),
            (Tool::Pdftoppm, &self.pdftoppm_path),
            (Tool::Tesseract, &self.tesseract_path),
        ]
        .into_iter()
        .filter_map(|(tool, path)| path.clone().map(|p| (tool, p)))
        .collect()
    }

    /// Allow-listed origins with blanks removed
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn body_limit(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn process_timeout(&self) -> Option<Duration> {
        self.process_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
