//! Port owner snapshot model.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// ============================================================================
// PortProcess
// ============================================================================

/// One OS process bound to one listening TCP port at query time.
///
/// This is a snapshot, not a handle: the PID may have exited (and been
/// reused) by the time the record is acted upon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortProcess {
    /// The port number (1-65535).
    pub port: u16,
    /// Process ID at query time.
    pub pid: u32,
    /// Short command name, possibly truncated by the native tool.
    pub process_name: String,
    /// Local address the socket is bound to (`*`, `127.0.0.1`, `[::1]`, ...).
    pub address: String,
    /// User running the process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Working directory of the process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<PathBuf>,
    /// Full command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_command: Option<String>,
    /// When the process started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Local>>,
}

impl PortProcess {
    /// Create a record with only the fields every platform tool reports.
    pub fn new(
        port: u16,
        pid: u32,
        process_name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            port,
            pid,
            process_name: process_name.into(),
            address: address.into(),
            owner: None,
            working_directory: None,
            full_command: None,
            start_time: None,
        }
    }

    /// Set the owning user.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Fill optional fields the native tool left empty.
    ///
    /// Fields already present are kept.
    pub fn enrich(&mut self, details: ProcessDetails) {
        if self.owner.is_none() {
            self.owner = details.owner;
        }
        if self.working_directory.is_none() {
            self.working_directory = details.working_directory;
        }
        if self.full_command.is_none() {
            self.full_command = details.full_command;
        }
        if self.start_time.is_none() {
            self.start_time = details.start_time;
        }
    }

    /// Get the formatted port number for display (e.g., ":3000").
    pub fn display_port(&self) -> String {
        format!(":{}", self.port)
    }

    /// Full command when known, otherwise the short process name.
    pub fn command_or_name(&self) -> &str {
        self.full_command.as_deref().unwrap_or(&self.process_name)
    }
}

impl std::fmt::Display for PortProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (PID {}) on {}",
            self.process_name,
            self.pid,
            self.display_port()
        )
    }
}

/// Ordered set of listeners, one entry per (port, pid), in tool order.
pub type ListeningPortSet = Vec<PortProcess>;

// ============================================================================
// ProcessDetails
// ============================================================================

/// Optional per-process fields resolved outside the socket tool.
///
/// Every field is independently optional; permission failures leave it `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessDetails {
    pub owner: Option<String>,
    pub working_directory: Option<PathBuf>,
    pub full_command: Option<String>,
    pub start_time: Option<DateTime<Local>>,
}
