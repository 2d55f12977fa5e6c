//! `ss` output grammar (Linux).
//!
//! ```text
//! LISTEN 0 4096 [::ffff:127.0.0.1]:63342 *:* users:(("rustrover",pid=53561,fd=54))
//! ```
//!
//! Columns: State, Recv-Q, Send-Q, Local Address:Port, Peer Address:Port, Process.
//! The Process column is missing for sockets owned by other users when not root.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::domain::PortProcess;

use super::address::split_host_port;
use super::{Dedup, Listing};

const MIN_COLUMNS: usize = 5;

fn users_regex() -> &'static Regex {
    static USERS: OnceLock<Regex> = OnceLock::new();
    USERS.get_or_init(|| {
        Regex::new(r#"\("((?:[^"\\]|\\.)*)",pid=([^,)]*),fd=[^)]*\)"#).expect("valid users regex")
    })
}

/// Parse `ss -Htlnp` output.
///
/// A LISTEN line that yields no owning PID still proves the port is taken;
/// its port is reported in [`Listing::unresolved`].
pub fn parse(output: &str) -> Listing {
    let mut dedup = Dedup::default();
    let mut unresolved: Vec<u16> = Vec::new();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("State") {
            continue;
        }

        let components: Vec<&str> = line.split_whitespace().collect();
        if components.len() < MIN_COLUMNS {
            debug!(line, "skipping short ss line");
            continue;
        }

        if components[0] != "LISTEN" {
            debug!(line, "skipping non-LISTEN ss line");
            continue;
        }

        let Some((address, port)) = split_host_port(components[3]) else {
            debug!(line, "skipping ss line without a local port");
            continue;
        };

        // Process names may contain spaces, so rejoin everything after the peer column
        let process_column = components[MIN_COLUMNS..].join(" ");
        let mut resolved = false;
        for caps in users_regex().captures_iter(&process_column) {
            let pid = match caps[2].parse::<u32>() {
                Ok(p) if p > 0 => p,
                _ => {
                    debug!(line, pid = &caps[2], "skipping ss entry with unparsable PID");
                    continue;
                }
            };
            dedup.push(PortProcess::new(port, pid, &caps[1], address.clone()));
            resolved = true;
        }

        if !resolved {
            debug!(line, port, "listener without a readable owner (insufficient privilege?)");
            if !unresolved.contains(&port) {
                unresolved.push(port);
            }
        }
    }

    Listing {
        records: dedup.into_records(),
        unresolved,
    }
}
