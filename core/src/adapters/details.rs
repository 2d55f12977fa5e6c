//! Process detail adapter using sysinfo.
//!
//! Reads the OS process table directly, so enrichment never spawns a process.

use std::collections::HashMap;
use std::ffi::OsString;

use chrono::{Local, TimeZone};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users};
use tracing::debug;

use crate::domain::ProcessDetails;
use crate::ports::DetailSource;

/// Resolves owner, working directory, command line and start time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoDetails;

impl SysinfoDetails {
    pub fn new() -> Self {
        Self
    }
}

impl DetailSource for SysinfoDetails {
    fn details(&self, pids: &[u32]) -> HashMap<u32, ProcessDetails> {
        if pids.is_empty() {
            return HashMap::new();
        }

        let targets: Vec<Pid> = pids.iter().map(|pid| Pid::from_u32(*pid)).collect();
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&targets),
            ProcessRefreshKind::new()
                .with_cmd(UpdateKind::Always)
                .with_cwd(UpdateKind::Always)
                .with_user(UpdateKind::Always),
        );
        let users = Users::new_with_refreshed_list();

        let mut resolved = HashMap::new();
        for pid in pids {
            let Some(process) = system.process(Pid::from_u32(*pid)) else {
                debug!(pid, "process vanished before details could be read");
                continue;
            };

            let owner = process
                .user_id()
                .and_then(|uid| users.get_user_by_id(uid))
                .map(|user| user.name().to_string());

            let working_directory = process
                .cwd()
                .filter(|cwd| !cwd.as_os_str().is_empty())
                .map(|cwd| cwd.to_path_buf());

            let full_command = join_args(process.cmd());

            let start_time = match process.start_time() {
                0 => None,
                secs => Local.timestamp_opt(secs as i64, 0).single(),
            };

            resolved.insert(
                *pid,
                ProcessDetails {
                    owner,
                    working_directory,
                    full_command,
                    start_time,
                },
            );
        }

        resolved
    }
}

/// Space-joined command line; arguments that are not valid UTF-8 are converted lossily.
fn join_args(args: &[OsString]) -> Option<String> {
    if args.is_empty() {
        return None;
    }
    let parts: Vec<_> = args.iter().map(|arg| arg.to_string_lossy()).collect();
    Some(parts.join(" "))
}
