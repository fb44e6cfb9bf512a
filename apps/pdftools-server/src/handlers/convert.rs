//! `POST /api/convert` - office format conversion through LibreOffice

use std::ffi::OsString;
use std::path::{Component, Path, Prefix};

use axum::extract::{Multipart, State};
use tracing::info;

use super::{attachment, FileResponse, BINARY_CONTENT_TYPE};
use crate::binaries::Tool;
use crate::error::ApiError;
use crate::form::{is_safe_extension, ToolForm};
use crate::process;
use crate::AppState;

const INPUT_STEM: &str = "input";

/// Normalize the requested target format: trimmed, no leading dot, lowercase,
/// 1-10 ASCII alphanumerics
pub fn parse_target(raw: &str) -> Result<String, ApiError> {
    let target = raw.trim().trim_start_matches('.').to_ascii_lowercase();
    if is_safe_extension(&target) {
        Ok(target)
    } else {
        Err(ApiError::MissingInput(format!(
            "Invalid target format '{}'",
            raw.trim()
        )))
    }
}

/// `file:///` URL for an absolute path, each segment percent-encoded
pub fn file_url(path: &Path) -> String {
    let segments: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::Prefix(prefix) => Some(match prefix.kind() {
                Prefix::Disk(drive) | Prefix::VerbatimDisk(drive) => {
                    format!("{}:", drive as char)
                }
                _ => prefix.as_os_str().to_string_lossy().into_owned(),
            }),
            Component::Normal(segment) => {
                Some(urlencoding::encode(&segment.to_string_lossy()).into_owned())
            }
            Component::RootDir | Component::CurDir | Component::ParentDir => None,
        })
        .collect();
    format!("file:///{}", segments.join("/"))
}

/// `soffice` arguments; the profile directory keeps concurrent conversions
/// from contending for the default user installation
pub fn soffice_args(target: &str, profile_dir: &Path, out_dir: &Path, input: &Path) -> Vec<OsString> {
    vec![
        format!("-env:UserInstallation={}", file_url(profile_dir)).into(),
        "--headless".into(),
        "--norestore".into(),
        "--convert-to".into(),
        target.into(),
        "--outdir".into(),
        out_dir.into(),
        input.into(),
    ]
}

/// Handler: POST /api/convert
pub async fn handle_convert(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<FileResponse, ApiError> {
    let mut form = ToolForm::from_multipart(multipart).await?;
    let upload = form.require_file()?;
    let target = parse_target(form.require_text("target")?)?;

    info!(
        "Convert request: {} bytes {:?} -> {}",
        upload.bytes.len(),
        upload.file_name,
        target
    );

    let soffice = state.require(Tool::LibreOffice)?;
    let workspace = state.workspace().await?;
    // The profile URL must be absolute even under a relative temp root
    let root = tokio::fs::canonicalize(workspace.path()).await?;

    // LibreOffice picks its import filter from the extension
    let input_name = match upload.extension() {
        Some(ext) => format!("{}.{}", INPUT_STEM, ext),
        None => INPUT_STEM.to_string(),
    };
    let in_dir = workspace.subdir("in").await?;
    let out_dir = workspace.subdir("out").await?;
    let input_path = in_dir.join(&input_name);
    tokio::fs::write(&input_path, &upload.bytes).await?;

    let output = process::run(
        Tool::LibreOffice,
        &soffice,
        &soffice_args(&target, &root.join("profile"), &out_dir, &input_path),
        state.process_timeout,
    )
    .await?;
    process::check_status(Tool::LibreOffice, &output, &[])?;

    let expected = out_dir.join(format!("{}.{}", INPUT_STEM, target));
    let converted = tokio::fs::read(&expected).await.map_err(|_| {
        ApiError::Processing(format!("LibreOffice did not produce a .{} file", target))
    })?;

    Ok(attachment(
        converted,
        BINARY_CONTENT_TYPE,
        &format!("converted.{}", target),
    ))
}
