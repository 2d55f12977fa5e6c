//! Platform probe adapter.
//!
//! Runs the native socket tool for the detected platform and hands back its
//! raw stdout. No parsing happens here.

mod darwin;
mod linux;

use std::io::ErrorKind;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::Platform;
use crate::error::{Error, Result};
use crate::ports::{ProbePort, ProbeQuery, RawOutput};

/// Full argv (program first) the probe runs for a query on a platform.
pub fn command_line(platform: Platform, query: ProbeQuery) -> Vec<String> {
    match platform {
        Platform::MacOs => darwin::command_line(query),
        Platform::Linux => linux::command_line(query),
    }
}

/// Probe backed by the platform's native tool, chosen once at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemProbe {
    platform: Platform,
}

impl SystemProbe {
    /// Create a probe for the current platform.
    pub fn detect() -> Result<Self> {
        Ok(Self::new(Platform::detect()?))
    }

    /// Create a probe for an explicit platform.
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl ProbePort for SystemProbe {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn probe(&self, query: ProbeQuery) -> Result<RawOutput> {
        let tool = self.platform.tool();
        let argv = command_line(self.platform, query);
        debug!(command = %argv.join(" "), "running probe");

        let output = Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| spawn_error(tool, e))?;

        classify(
            tool,
            output.status.code().unwrap_or(-1),
            &output.stdout,
            &output.stderr,
        )
    }
}

/// A tool that cannot be spawned because it is missing is unavailable, not broken.
fn spawn_error(tool: &'static str, err: std::io::Error) -> Error {
    match err.kind() {
        ErrorKind::NotFound => Error::ToolUnavailable { tool },
        _ => Error::Io(err),
    }
}

/// Decide whether a finished tool run is usable output or a probe failure.
///
/// - exit 0: output is valid (stderr warnings are logged, not fatal)
/// - non-zero, empty stderr: "nothing found"
/// - non-zero, stderr present: [`Error::ProbeExecution`] with stderr verbatim
pub fn classify(tool: &'static str, status: i32, stdout: &[u8], stderr: &[u8]) -> Result<RawOutput> {
    let text = String::from_utf8_lossy(stdout).into_owned();
    let diagnostics = String::from_utf8_lossy(stderr).trim().to_string();

    if status != 0 && !diagnostics.is_empty() {
        return Err(Error::ProbeExecution {
            tool,
            status,
            stderr: diagnostics,
        });
    }

    if !diagnostics.is_empty() {
        warn!(tool, stderr = %diagnostics, "probe succeeded with warnings");
    }
    if status != 0 {
        debug!(tool, status, "probe found nothing");
    }

    Ok(RawOutput {
        text,
        exit_status: status,
    })
}
