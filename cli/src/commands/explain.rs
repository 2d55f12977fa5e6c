//! Explain command - show the native commands behind each operation.

use std::process::ExitCode;

use anyhow::Result;
use portctl_core::{explain, Platform};

use super::{print_json, EXIT_OK};

pub fn run(operation: Option<String>, platform: Option<Platform>, json: bool) -> Result<ExitCode> {
    let platform = match platform {
        Some(platform) => platform,
        None => Platform::detect()?,
    };
    let entries = explain(operation.as_deref(), platform)?;

    if json {
        print_json(&entries)?;
    } else {
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print!("{}", entry);
        }
    }
    Ok(ExitCode::from(EXIT_OK))
}
