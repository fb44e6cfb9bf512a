//! Per-request scratch directories
//!
//! A [`Workspace`] owns a freshly created directory. Dropping it removes the
//! directory and everything in it, so every exit path of a handler (success,
//! early `?` return, or panic unwinding) releases the disk space.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

const DIR_PREFIX: &str = "pdftools-";

pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a new directory under `root`, or under the system temp dir
    pub fn create(root: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(DIR_PREFIX);

        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        debug!("Created workspace {}", dir.path().display());

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a subdirectory and return its path
    pub async fn subdir(&self, name: &str) -> io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        tokio::fs::create_dir_all(&path).await?;
        Ok(path)
    }

    /// Write `bytes` to `name` inside the workspace and return the full path
    pub async fn write(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Files directly inside `dir`
    pub async fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                files.push(entry.path());
            }
        }
        Ok(files)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        debug!("Removing workspace {}", self.dir.path().display());
    }
}
