//! Running external tools
//!
//! Children are spawned with `kill_on_drop`, so a request that is abandoned
//! (client disconnect or the optional timeout) does not leave the process
//! running against a directory that is about to be removed.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info};

use crate::binaries::Tool;
use crate::error::ApiError;

/// Longest stderr excerpt copied into an error message
const STDERR_EXCERPT: usize = 500;

/// Run `program` to completion and capture its output.
///
/// Only spawn failures and timeouts are errors here; the exit status is left
/// to [`check_status`].
pub async fn run(
    tool: Tool,
    program: &Path,
    args: &[OsString],
    timeout: Option<Duration>,
) -> Result<Output, ApiError> {
    info!("Running {} ({} args)", tool.display_name(), args.len());
    debug!("{} {:?}", program.display(), args);

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command.output();
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, child).await.map_err(|_| {
            ApiError::Processing(format!(
                "{} did not finish within {}s",
                tool.display_name(),
                limit.as_secs()
            ))
        })?,
        None => child.await,
    };

    result.map_err(|e| {
        ApiError::Processing(format!("Failed to execute {}: {}", tool.display_name(), e))
    })
}

/// Fail unless the tool exited successfully or with one of `tolerated` codes
pub fn check_status(tool: Tool, output: &Output, tolerated: &[i32]) -> Result<(), ApiError> {
    if output.status.success() {
        return Ok(());
    }
    if let Some(code) = output.status.code() {
        if tolerated.contains(&code) {
            debug!("{} exited with tolerated status {}", tool.display_name(), code);
            return Ok(());
        }
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let excerpt: String = stderr.trim().chars().take(STDERR_EXCERPT).collect();
    Err(ApiError::Processing(format!(
        "{} failed (exit code {}): {}",
        tool.display_name(),
        output
            .status
            .code()
            .map_or_else(|| "unknown".to_string(), |c| c.to_string()),
        excerpt
    )))
}
