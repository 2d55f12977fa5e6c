//! Error types for the portctl-core library.

use thiserror::Error;

/// Result type alias for portctl operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while probing ports and terminating processes.
///
/// "Nothing is listening" is not an error: lookups return `Option::None`.
#[derive(Error, Debug)]
pub enum Error {
    /// The native introspection tool is not installed or not on `PATH`.
    #[error("`{tool}` is not available on this system")]
    ToolUnavailable { tool: &'static str },

    /// The introspection tool ran but reported a real error on stderr.
    #[error("`{tool}` exited with status {status}: {stderr}")]
    ProbeExecution {
        tool: &'static str,
        status: i32,
        stderr: String,
    },

    /// The OS refused an operation on a process.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Signal delivery failed for a reason other than permissions.
    #[error("Failed to signal process {pid}: {reason}")]
    KillFailed { pid: u32, reason: String },

    /// The explainer has no entry for the requested operation.
    #[error("Unknown operation `{0}` (expected one of: who, list, kill, free)")]
    UnknownOperation(String),

    /// Port number outside 1-65535.
    #[error("Invalid port: {0}")]
    InvalidPort(u32),

    /// Platform not supported.
    #[error("Platform not supported: {0}")]
    UnsupportedPlatform(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ToolUnavailable { tool: "lsof" };
        assert!(err.to_string().contains("lsof"));

        let err = Error::ProbeExecution {
            tool: "ss",
            status: 1,
            stderr: "Cannot open netlink socket".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("status 1"));
        assert!(message.contains("Cannot open netlink socket"));

        let err = Error::UnknownOperation("nuke".to_string());
        assert!(err.to_string().contains("nuke"));
    }
}
