//! Who command - show the owner of one port.

use std::process::ExitCode;

use anyhow::{Context, Result};
use serde_json::json;

use super::{describe, port_service, print_json, EXIT_NEGATIVE, EXIT_OK};

pub async fn run(port: u16, json: bool) -> Result<ExitCode> {
    let service = port_service()?;
    let owner = service
        .find_owner(port)
        .await
        .with_context(|| format!("could not look up port {}", port))?;

    match owner {
        Some(process) => {
            if json {
                print_json(&process)?;
            } else {
                println!("{}", describe(&process));
            }
            Ok(ExitCode::from(EXIT_OK))
        }
        None => {
            if json {
                print_json(&json!({ "port": port, "owner": null }))?;
            } else {
                println!("Nothing is listening on port {}.", port);
            }
            Ok(ExitCode::from(EXIT_NEGATIVE))
        }
    }
}
