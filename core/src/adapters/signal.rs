//! Signal delivery adapter using `kill(2)` via nix.

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{kill, Signal};
#[cfg(unix)]
use nix::unistd::Pid;
use tracing::{debug, info, warn};

use crate::domain::SignalKind;
use crate::error::{Error, Result};
use crate::ports::{Delivery, SignalPort};

/// Sends real POSIX signals.
#[derive(Debug, Default, Clone, Copy)]
pub struct NixSignals;

impl NixSignals {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
fn to_pid(pid: u32) -> Result<Pid> {
    // Zero and negative values address process groups in kill(2)
    match i32::try_from(pid) {
        Ok(raw) if raw > 0 => Ok(Pid::from_raw(raw)),
        _ => Err(Error::KillFailed {
            pid,
            reason: "not a valid process id".to_string(),
        }),
    }
}

#[cfg(unix)]
impl From<SignalKind> for Signal {
    fn from(kind: SignalKind) -> Self {
        match kind {
            SignalKind::Graceful => Signal::SIGTERM,
            SignalKind::Forced => Signal::SIGKILL,
        }
    }
}

#[cfg(unix)]
impl SignalPort for NixSignals {
    fn send(&self, pid: u32, kind: SignalKind) -> Result<Delivery> {
        match kill(to_pid(pid)?, Signal::from(kind)) {
            Ok(()) => {
                info!(pid, signal = %kind, "signal delivered");
                Ok(Delivery::Delivered)
            }
            Err(Errno::ESRCH) => {
                debug!(pid, signal = %kind, "no such process");
                Ok(Delivery::NoSuchProcess)
            }
            Err(Errno::EPERM) => {
                warn!(pid, signal = %kind, "permission denied");
                Err(Error::PermissionDenied(format!(
                    "not allowed to send {} to PID {}",
                    kind, pid
                )))
            }
            Err(errno) => Err(Error::KillFailed {
                pid,
                reason: errno.desc().to_string(),
            }),
        }
    }

    fn is_alive(&self, pid: u32) -> bool {
        let Ok(target) = to_pid(pid) else {
            return false;
        };
        // Signal 0 only checks existence; EPERM means it exists under another user
        match kill(target, None) {
            Ok(()) | Err(Errno::EPERM) => true,
            Err(_) => false,
        }
    }
}

#[cfg(not(unix))]
impl SignalPort for NixSignals {
    fn send(&self, _pid: u32, _kind: SignalKind) -> Result<Delivery> {
        Err(Error::UnsupportedPlatform(
            "signal delivery requires a Unix system".to_string(),
        ))
    }

    fn is_alive(&self, _pid: u32) -> bool {
        false
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_current_process_is_alive() {
        assert!(NixSignals::new().is_alive(std::process::id()));
    }

    #[test]
    fn test_invalid_pids() {
        let signals = NixSignals::new();
        assert!(!signals.is_alive(0));
        assert!(!signals.is_alive(u32::MAX));
        assert!(matches!(
            signals.send(0, SignalKind::Graceful),
            Err(Error::KillFailed { pid: 0, .. })
        ));
    }

    #[test]
    fn test_terminate_child_process() {
        let mut child = std::process::Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("spawn sleep");
        let signals = NixSignals::new();

        let delivery = signals.send(child.id(), SignalKind::Graceful).unwrap();
        assert_eq!(delivery, Delivery::Delivered);

        // Reap the child so the PID disappears instead of lingering as a zombie
        child.wait().unwrap();
        assert!(!signals.is_alive(child.id()));
        assert_eq!(
            signals.send(child.id(), SignalKind::Forced).unwrap(),
            Delivery::NoSuchProcess
        );
    }
}
