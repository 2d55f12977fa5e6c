//! Interactive y/N confirmation on the terminal.

use std::io::Write;

use portctl_core::{Confirmer, PortProcess};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Asks on stderr and reads the answer from stdin.
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    async fn confirm(&self, target: &PortProcess) -> bool {
        if !atty::is(atty::Stream::Stdin) {
            eprintln!("stdin is not a terminal; pass -y to kill without confirmation");
            return false;
        }

        let owner = target.owner.as_deref().unwrap_or("unknown user");
        eprint!(
            "Kill {} (PID {}, {}) listening on port {}? [y/N] ",
            target.process_name, target.pid, owner, target.port
        );
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        match reader.read_line(&mut answer).await {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

/// Only an explicit "y"/"yes" counts as consent.
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
