//! Signal kinds and termination outcomes.

use serde::{Deserialize, Serialize};

/// The two signals the termination controller ever sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    /// SIGTERM: the process may catch it and shut down cleanly.
    Graceful,
    /// SIGKILL: cannot be caught or delayed.
    Forced,
}

impl SignalKind {
    /// Signal name without the `SIG` prefix, as accepted by `kill -<name>`.
    pub fn name(&self) -> &'static str {
        match self {
            SignalKind::Graceful => "TERM",
            SignalKind::Forced => "KILL",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SIG{}", self.name())
    }
}

/// Terminal outcome of a termination request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum KillOutcome {
    /// Nothing was listening on the port.
    NothingToKill,
    /// The operator declined the confirmation prompt. No signal was sent.
    Cancelled,
    /// The process is gone.
    Terminated,
    /// Still alive after the grace period and force was not requested.
    StillRunning,
    /// Signal delivery was refused, or the process survived SIGKILL.
    Failed { reason: String },
    /// The operator aborted while waiting. No further signal was sent.
    Interrupted,
}

impl KillOutcome {
    /// Whether the port owner is verifiably not running any more.
    pub fn is_success(&self) -> bool {
        matches!(self, KillOutcome::Terminated | KillOutcome::NothingToKill)
    }
}

impl std::fmt::Display for KillOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KillOutcome::NothingToKill => write!(f, "nothing to kill"),
            KillOutcome::Cancelled => write!(f, "cancelled"),
            KillOutcome::Terminated => write!(f, "terminated"),
            KillOutcome::StillRunning => write!(f, "still running"),
            KillOutcome::Failed { reason } => write!(f, "failed: {}", reason),
            KillOutcome::Interrupted => write!(f, "interrupted"),
        }
    }
}
