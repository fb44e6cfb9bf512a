//! Locating external binaries
//!
//! Each tool is resolved in a fixed order and the first executable wins:
//! 1. the path configured for it (env/CLI override)
//! 2. its command names looked up on `PATH`
//! 3. a short list of well-known install locations
//!
//! Filesystem access goes through [`Probe`] so resolution can be tested with
//! scripted outcomes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

/// External programs the server can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Qpdf,
    LibreOffice,
    Pdftoppm,
    Tesseract,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Qpdf, Tool::LibreOffice, Tool::Pdftoppm, Tool::Tesseract];

    pub fn display_name(self) -> &'static str {
        match self {
            Tool::Qpdf => "qpdf",
            Tool::LibreOffice => "LibreOffice",
            Tool::Pdftoppm => "pdftoppm",
            Tool::Tesseract => "tesseract",
        }
    }

    /// Names tried on `PATH`, in order
    pub fn command_names(self) -> &'static [&'static str] {
        match self {
            Tool::Qpdf => &["qpdf"],
            Tool::LibreOffice => &["soffice", "libreoffice"],
            Tool::Pdftoppm => &["pdftoppm"],
            Tool::Tesseract => &["tesseract"],
        }
    }

    /// Platform install locations tried last
    pub fn fallback_paths(self) -> &'static [&'static str] {
        match self {
            Tool::Qpdf => &[
                "/usr/bin/qpdf",
                "/usr/local/bin/qpdf",
                "/opt/homebrew/bin/qpdf",
                r"C:\Program Files\qpdf\bin\qpdf.exe",
            ],
            Tool::LibreOffice => &[
                "/usr/bin/soffice",
                "/usr/lib/libreoffice/program/soffice",
                "/opt/libreoffice/program/soffice",
                "/Applications/LibreOffice.app/Contents/MacOS/soffice",
                r"C:\Program Files\LibreOffice\program\soffice.exe",
            ],
            Tool::Pdftoppm => &[
                "/usr/bin/pdftoppm",
                "/usr/local/bin/pdftoppm",
                "/opt/homebrew/bin/pdftoppm",
            ],
            Tool::Tesseract => &[
                "/usr/bin/tesseract",
                "/usr/local/bin/tesseract",
                "/opt/homebrew/bin/tesseract",
            ],
        }
    }
}

/// Filesystem questions the resolver needs answered
pub trait Probe: Send + Sync {
    fn is_executable(&self, path: &Path) -> bool;

    fn find_in_path(&self, name: &str) -> Option<PathBuf>;
}

/// Probe backed by the real filesystem and `PATH`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl Probe for SystemProbe {
    fn is_executable(&self, path: &Path) -> bool {
        let Ok(meta) = std::fs::metadata(path) else {
            return false;
        };
        if !meta.is_file() {
            return false;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            meta.permissions().mode() & 0o111 != 0
        }
        #[cfg(not(unix))]
        {
            true
        }
    }

    fn find_in_path(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}

/// Resolve one binary: configured path, then `PATH`, then fallbacks
pub fn resolve_binary(
    configured: Option<&Path>,
    command_names: &[&str],
    fallback_paths: &[&str],
    probe: &dyn Probe,
) -> Option<PathBuf> {
    if let Some(path) = configured {
        if probe.is_executable(path) {
            return Some(path.to_path_buf());
        }
        debug!("Configured binary {} is not executable", path.display());
    }

    command_names
        .iter()
        .find_map(|name| probe.find_in_path(name))
        .or_else(|| {
            fallback_paths
                .iter()
                .map(PathBuf::from)
                .find(|path| probe.is_executable(path))
        })
}

/// Per-tool resolution with configured overrides
#[derive(Clone)]
pub struct BinaryResolver {
    overrides: HashMap<Tool, PathBuf>,
    probe: Arc<dyn Probe>,
}

impl BinaryResolver {
    pub fn new(overrides: HashMap<Tool, PathBuf>, probe: Arc<dyn Probe>) -> Self {
        Self { overrides, probe }
    }

    pub fn system(overrides: HashMap<Tool, PathBuf>) -> Self {
        Self::new(overrides, Arc::new(SystemProbe))
    }

    pub fn resolve(&self, tool: Tool) -> Option<PathBuf> {
        let found = resolve_binary(
            self.overrides.get(&tool).map(PathBuf::as_path),
            tool.command_names(),
            tool.fallback_paths(),
            self.probe.as_ref(),
        );
        debug!("Resolved {}: {:?}", tool.display_name(), found);
        found
    }

    pub fn is_available(&self, tool: Tool) -> bool {
        self.resolve(tool).is_some()
    }
}
