//! Wrappers around the external programs the pipeline delegates to: the
//! GraphStream animation jar, gvmap, OSLOM2, Infomap, montage and ffmpeg.
//! Each wrapper logs the command line at debug level and maps a nonzero exit
//! status to a `Tool` error carrying the captured stderr.

pub mod ffmpeg;
pub mod graphstream;
pub mod gvmap;
pub mod infomap;
pub mod montage;
pub mod oslom;

use std::process::{Command, Output, Stdio};

use tracing::debug;

use crate::error::{PartanimError, PartanimResult};

/// Run a prepared command to completion, capturing output.
pub(crate) fn run_logged(cmd: &mut Command, tool: &str) -> PartanimResult<Output> {
    debug!(tool, command = ?cmd, "invoking external tool");
    let output = cmd
        .stdin(Stdio::null())
        .output()
        .map_err(|e| PartanimError::tool(format!("failed to spawn {tool}: {e}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PartanimError::tool(format!(
            "{tool} exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(output)
}

/// Probe for a binary by asking it for its version: spawn, ignore output,
/// look only at the exit status.
pub fn is_on_path(binary: &str, probe_arg: &str) -> bool {
    Command::new(binary)
        .arg(probe_arg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
