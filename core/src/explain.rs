//! Static registry explaining which native command each operation runs.
//!
//! Pure lookup over constant data; nothing here executes anything. The
//! command templates mirror `adapters::probe::command_line` and are held to
//! it by the conformance tests below.

use serde::Serialize;

use crate::domain::{Operation, Platform};
use crate::error::Result;

/// One flag of a native command and what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlagNote {
    pub flag: &'static str,
    pub meaning: &'static str,
}

/// How one operation is carried out on one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExplainEntry {
    pub operation: Operation,
    pub platform: Platform,
    /// Command template; `<port>` and `<pid>` are placeholders.
    pub command: &'static str,
    pub breakdown: &'static [FlagNote],
}

const fn note(flag: &'static str, meaning: &'static str) -> FlagNote {
    FlagNote { flag, meaning }
}

const LSOF_PORT: &[FlagNote] = &[
    note("-n", "show IP addresses, skip hostname lookups"),
    note("-P", "show port numbers, skip service name lookups"),
    note("-iTCP:<port>", "only TCP sockets on this port"),
    note("-sTCP:LISTEN", "only sockets in the LISTEN state"),
];

const LSOF_ALL: &[FlagNote] = &[
    note("-n", "show IP addresses, skip hostname lookups"),
    note("-P", "show port numbers, skip service name lookups"),
    note("-iTCP", "only TCP sockets, any port"),
    note("-sTCP:LISTEN", "only sockets in the LISTEN state"),
];

const SS_PORT: &[FlagNote] = &[
    note("-H", "no header line"),
    note("-t", "only TCP sockets"),
    note("-l", "only listening sockets"),
    note("-n", "numeric addresses and ports, no name lookups"),
    note("-p", "show the process owning each socket"),
    note("sport = :<port>", "filter on the local (source) port"),
];

const SS_ALL: &[FlagNote] = &[
    note("-H", "no header line"),
    note("-t", "only TCP sockets"),
    note("-l", "only listening sockets"),
    note("-n", "numeric addresses and ports, no name lookups"),
    note("-p", "show the process owning each socket"),
];

const KILL_MACOS: &[FlagNote] = &[
    note("<pid>", "owner found with: lsof -nP -iTCP:<port> -sTCP:LISTEN"),
    note("-TERM", "graceful stop; the process may clean up first"),
    note("-KILL", "sent only with --force, after the grace period expires"),
    note("-0", "liveness check while waiting (no signal delivered)"),
];

const KILL_LINUX: &[FlagNote] = &[
    note("<pid>", "owner found with: ss -Htlnp sport = :<port>"),
    note("-TERM", "graceful stop; the process may clean up first"),
    note("-KILL", "sent only with --force, after the grace period expires"),
    note("-0", "liveness check while waiting (no signal delivered)"),
];

static REGISTRY: [ExplainEntry; 8] = [
    ExplainEntry {
        operation: Operation::Who,
        platform: Platform::MacOs,
        command: "lsof -nP -iTCP:<port> -sTCP:LISTEN",
        breakdown: LSOF_PORT,
    },
    ExplainEntry {
        operation: Operation::List,
        platform: Platform::MacOs,
        command: "lsof -nP -iTCP -sTCP:LISTEN",
        breakdown: LSOF_ALL,
    },
    ExplainEntry {
        operation: Operation::Kill,
        platform: Platform::MacOs,
        command: "kill -TERM <pid>",
        breakdown: KILL_MACOS,
    },
    ExplainEntry {
        operation: Operation::Free,
        platform: Platform::MacOs,
        command: "lsof -nP -iTCP:<port> -sTCP:LISTEN",
        breakdown: LSOF_PORT,
    },
    ExplainEntry {
        operation: Operation::Who,
        platform: Platform::Linux,
        command: "ss -Htlnp sport = :<port>",
        breakdown: SS_PORT,
    },
    ExplainEntry {
        operation: Operation::List,
        platform: Platform::Linux,
        command: "ss -Htlnp",
        breakdown: SS_ALL,
    },
    ExplainEntry {
        operation: Operation::Kill,
        platform: Platform::Linux,
        command: "kill -TERM <pid>",
        breakdown: KILL_LINUX,
    },
    ExplainEntry {
        operation: Operation::Free,
        platform: Platform::Linux,
        command: "ss -Htlnp sport = :<port>",
        breakdown: SS_PORT,
    },
];

impl ExplainEntry {
    /// The command with `<port>` filled in.
    pub fn render(&self, port: u16) -> String {
        self.command.replace("<port>", &port.to_string())
    }

    /// Entry for one operation on one platform.
    pub fn lookup(operation: Operation, platform: Platform) -> &'static ExplainEntry {
        let row = match platform {
            Platform::MacOs => 0,
            Platform::Linux => Operation::ALL.len(),
        };
        let column = match operation {
            Operation::Who => 0,
            Operation::List => 1,
            Operation::Kill => 2,
            Operation::Free => 3,
        };
        &REGISTRY[row + column]
    }

    /// Every entry for a platform, in operation order.
    pub fn all(platform: Platform) -> Vec<&'static ExplainEntry> {
        Operation::ALL
            .iter()
            .map(|operation| Self::lookup(*operation, platform))
            .collect()
    }
}

impl std::fmt::Display for ExplainEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({})", self.operation, self.platform)?;
        writeln!(f, "  $ {}", self.command)?;
        let width = self.breakdown.iter().map(|n| n.flag.len()).max().unwrap_or(0);
        for note in self.breakdown {
            writeln!(f, "    {:<width$}  {}", note.flag, note.meaning, width = width)?;
        }
        Ok(())
    }
}

/// Explain one operation by name, or every operation when `operation` is `None`.
pub fn explain(operation: Option<&str>, platform: Platform) -> Result<Vec<&'static ExplainEntry>> {
    match operation {
        Some(name) => Ok(vec![ExplainEntry::lookup(name.parse()?, platform)]),
        None => Ok(ExplainEntry::all(platform)),
    }
}
