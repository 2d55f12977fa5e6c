//! Subcommand implementations.

pub mod explain;
pub mod free;
pub mod kill;
pub mod list;
pub mod who;

use anyhow::Result;
use portctl_core::{PortProcess, PortService, SysinfoDetails, SystemProbe};
use serde::Serialize;

/// Success, port free, or process stopped.
pub const EXIT_OK: u8 = 0;
/// Port occupied (`free`), owner not found (`who`), or process not stopped (`kill`).
pub const EXIT_NEGATIVE: u8 = 1;
/// The question could not be answered (tool missing, probe failure, bad input).
pub const EXIT_ERROR: u8 = 2;
/// The operator pressed Ctrl-C during `kill`.
pub const EXIT_INTERRUPTED: u8 = 130;

/// Query service wired to the real OS for the detected platform.
pub fn port_service() -> Result<PortService<SystemProbe, SysinfoDetails>> {
    Ok(PortService::new(SystemProbe::detect()?, SysinfoDetails::new()))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Multi-line description of a port owner; absent fields are omitted.
pub fn describe(process: &PortProcess) -> String {
    let mut lines = vec![format!(
        "Port {} is owned by {} (PID {})",
        process.port, process.process_name, process.pid
    )];

    let mut field = |label: &str, value: String| lines.push(format!("  {:<9} {}", label, value));
    field("address:", process.address.clone());
    if let Some(owner) = &process.owner {
        field("user:", owner.clone());
    }
    if let Some(cwd) = &process.working_directory {
        field("cwd:", cwd.display().to_string());
    }
    if let Some(command) = &process.full_command {
        field("command:", command.clone());
    }
    if let Some(started) = &process.start_time {
        field("started:", started.format("%Y-%m-%d %H:%M:%S").to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_describe_skips_missing_fields() {
        let process = PortProcess::new(3000, 12345, "node", "*").with_owner("alice");
        let text = describe(&process);

        assert!(text.starts_with("Port 3000 is owned by node (PID 12345)"));
        assert!(text.contains("user:     alice"));
        assert!(!text.contains("cwd:"));
        assert!(!text.contains("started:"));
    }

    #[test]
    fn test_describe_includes_details() {
        let mut process = PortProcess::new(8080, 42, "java", "127.0.0.1");
        process.working_directory = Some(PathBuf::from("/opt/app"));
        process.full_command = Some("java -jar app.jar".to_string());

        let text = describe(&process);
        assert!(text.contains("cwd:      /opt/app"));
        assert!(text.contains("command:  java -jar app.jar"));
    }
}
