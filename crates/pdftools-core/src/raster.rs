//! Ordering of rasterizer output
//!
//! `pdftoppm` names its images `<prefix>-<page>.jpg`, zero-padding the page
//! number to the width of the last page number. The padding width depends on
//! the document, so files are ordered by the parsed number rather than by
//! name.

use std::path::{Path, PathBuf};

/// Output resolution requested from the rasterizer
pub const RASTER_DPI: u32 = 220;

/// File name prefix handed to the rasterizer
pub const RASTER_PREFIX: &str = "page";

const RASTER_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// Page number embedded in a raster file name, if the name matches
/// `<prefix>-<digits>.jpg`
pub fn raster_page_number(file_name: &str, prefix: &str) -> Option<u32> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if !RASTER_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
        return None;
    }

    let digits = stem.strip_prefix(prefix)?.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Keep only raster files and sort them by page number
pub fn order_rasters<I>(paths: I, prefix: &str) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut numbered: Vec<(u32, PathBuf)> = paths
        .into_iter()
        .filter_map(|path| {
            let page = file_name(&path).and_then(|name| raster_page_number(name, prefix))?;
            Some((page, path))
        })
        .collect();

    numbered.sort_by_key(|(page, _)| *page);
    numbered.into_iter().map(|(_, path)| path).collect()
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
