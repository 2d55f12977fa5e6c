//! Free command - script-friendly occupancy check.
//!
//! Exit status is the contract: 0 when the port is unoccupied, 1 when
//! something listens on it. Errors exit with 2 so they are never mistaken
//! for either answer.

use std::process::ExitCode;

use anyhow::{Context, Result};
use serde_json::json;

use super::{port_service, print_json, EXIT_NEGATIVE, EXIT_OK};

pub async fn run(port: u16, json: bool) -> Result<ExitCode> {
    let service = port_service()?;
    let owner = service
        .find_owner(port)
        .await
        .with_context(|| format!("could not check port {}", port))?;
    let free = owner.is_none();

    if json {
        print_json(&json!({
            "port": port,
            "free": free,
            "owner": owner,
        }))?;
    } else {
        match &owner {
            None => println!("Port {} is free.", port),
            Some(process) => println!(
                "Port {} is in use by {} (PID {}).",
                port, process.process_name, process.pid
            ),
        }
    }

    Ok(ExitCode::from(exit_status(free)))
}

fn exit_status(free: bool) -> u8 {
    if free {
        EXIT_OK
    } else {
        EXIT_NEGATIVE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_contract() {
        assert_eq!(exit_status(true), 0);
        assert_eq!(exit_status(false), 1);
    }
}
