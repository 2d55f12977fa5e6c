//! Signal delivery port (interface).

use crate::domain::SignalKind;
use crate::error::Result;

/// Result of a delivery attempt that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The OS accepted the signal.
    Delivered,
    /// No process with that PID exists.
    NoSuchProcess,
}

/// Port for sending signals to processes.
///
/// Permission failures must be returned as `Error::PermissionDenied`,
/// never folded into `Delivery`.
pub trait SignalPort: Send + Sync {
    /// Send `kind` to `pid`.
    fn send(&self, pid: u32, kind: SignalKind) -> Result<Delivery>;

    /// Check if a process with this PID currently exists.
    fn is_alive(&self, pid: u32) -> bool;
}
