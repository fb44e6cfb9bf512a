//! qpdf-backed endpoints: protect, unlock, repair

use std::ffi::OsString;
use std::path::Path;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use tracing::info;

use super::{attachment, FileResponse, PDF_CONTENT_TYPE};
use crate::binaries::Tool;
use crate::error::ApiError;
use crate::form::ToolForm;
use crate::process;
use crate::AppState;

/// qpdf's "operation succeeded with warnings" exit status
const QPDF_EXIT_WARNINGS: i32 = 3;

/// What qpdf is asked to do with the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QpdfAction {
    /// AES-256 with the same user and owner password
    Encrypt { password: String },
    Decrypt { password: Option<String> },
    /// Full rewrite; qpdf reconstructs damaged cross-reference data on load
    Repair,
}

impl QpdfAction {
    pub fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = match self {
            // Attached `--name=value` form, so a password starting with `-`
            // or `@` is never read as an option or an argument file
            QpdfAction::Encrypt { password } => vec![
                "--encrypt".into(),
                format!("--user-password={}", password).into(),
                format!("--owner-password={}", password).into(),
                "--bits=256".into(),
                "--".into(),
            ],
            QpdfAction::Decrypt { password } => {
                let mut args: Vec<OsString> = vec!["--decrypt".into()];
                if let Some(password) = password {
                    args.push(format!("--password={}", password).into());
                }
                args
            }
            QpdfAction::Repair => vec!["--linearize".into()],
        };
        args.push(input.into());
        args.push(output.into());
        args
    }

    fn label(&self) -> &'static str {
        match self {
            QpdfAction::Encrypt { .. } => "protect",
            QpdfAction::Decrypt { .. } => "unlock",
            QpdfAction::Repair => "repair",
        }
    }

    fn output_name(&self) -> &'static str {
        match self {
            QpdfAction::Encrypt { .. } => "protected.pdf",
            QpdfAction::Decrypt { .. } => "unlocked.pdf",
            QpdfAction::Repair => "repaired.pdf",
        }
    }
}

/// Write the input, run qpdf, read back the single output file
pub async fn run_qpdf(
    state: &AppState,
    input: &Bytes,
    action: &QpdfAction,
) -> Result<Vec<u8>, ApiError> {
    let qpdf = state.require(Tool::Qpdf)?;
    let workspace = state.workspace().await?;

    let input_path = workspace.write("input.pdf", input).await?;
    let output_path = workspace.path().join("output.pdf");

    let output = process::run(
        Tool::Qpdf,
        &qpdf,
        &action.args(&input_path, &output_path),
        state.process_timeout,
    )
    .await?;
    process::check_status(Tool::Qpdf, &output, &[QPDF_EXIT_WARNINGS])?;

    tokio::fs::read(&output_path).await.map_err(|e| {
        ApiError::Processing(format!("qpdf did not produce an output file: {}", e))
    })
}

async fn respond(
    state: AppState,
    multipart: Multipart,
    action: impl FnOnce(&ToolForm) -> Result<QpdfAction, ApiError>,
) -> Result<FileResponse, ApiError> {
    let mut form = ToolForm::from_multipart(multipart).await?;
    let upload = form.require_file()?;
    let action = action(&form)?;

    info!("{} request: {} bytes", action.label(), upload.bytes.len());
    let output = run_qpdf(&state, &upload.bytes, &action).await?;

    Ok(attachment(output, PDF_CONTENT_TYPE, action.output_name()))
}

/// Handler: POST /api/protect-pdf
pub async fn handle_protect(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<FileResponse, ApiError> {
    respond(state, multipart, |form| {
        let password = form.require_text("password")?;
        Ok(QpdfAction::Encrypt {
            password: password.to_string(),
        })
    })
    .await
}

/// Handler: POST /api/unlock-pdf
pub async fn handle_unlock(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<FileResponse, ApiError> {
    respond(state, multipart, |form| {
        Ok(QpdfAction::Decrypt {
            password: form
                .text("password")
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        })
    })
    .await
}

/// Handler: POST /api/repair-pdf
pub async fn handle_repair(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<FileResponse, ApiError> {
    respond(state, multipart, |_| Ok(QpdfAction::Repair)).await
}
