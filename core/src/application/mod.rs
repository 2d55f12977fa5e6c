//! Application layer - Use case services.
//!
//! Services orchestrate domain logic and adapter interactions:
//! - Accept domain types as inputs
//! - Use ports (traits) for external dependencies
//! - Return domain types as outputs

mod cancel;
mod port_service;
mod terminator;

pub use cancel::CancelToken;
pub use port_service::PortService;
pub use terminator::{
    KillEvent, KillOptions, KillReport, KillState, Step, Terminator, DEFAULT_FORCE_WAIT,
    DEFAULT_GRACE_PERIOD, DEFAULT_POLL_INTERVAL, MAX_WAIT,
};

#[cfg(test)]
mod tests {
    //! Port 3000 owned by alice's node process (PID 12345), end to end
    //! through probe text, service and terminator.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::domain::{KillOutcome, Platform, PortProcess, ProcessDetails, SignalKind};
    use crate::error::Result;
    use crate::ports::{
        Confirmer, Delivery, DetailSource, ProbePort, ProbeQuery, RawOutput, SignalPort,
    };

    const LSOF_PORT_3000: &str = "\
COMMAND   PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
node    12345 alice   23u  IPv6 0x9a1c26e0ab52f3d1      0t0  TCP *:3000 (LISTEN)
";

    struct CannedProbe;

    impl ProbePort for CannedProbe {
        fn platform(&self) -> Platform {
            Platform::MacOs
        }

        async fn probe(&self, query: ProbeQuery) -> Result<RawOutput> {
            let text = match query {
                ProbeQuery::Port(3000) | ProbeQuery::All => LSOF_PORT_3000,
                // lsof prints nothing and exits 1 when no socket matches
                ProbeQuery::Port(_) => "",
            };
            Ok(RawOutput {
                text: text.to_string(),
                exit_status: if text.is_empty() { 1 } else { 0 },
            })
        }
    }

    /// Linux probe run without root: another user's listener on 5432.
    struct UnprivilegedProbe;

    impl ProbePort for UnprivilegedProbe {
        fn platform(&self) -> Platform {
            Platform::Linux
        }

        async fn probe(&self, _query: ProbeQuery) -> Result<RawOutput> {
            Ok(RawOutput {
                text: "LISTEN 0 244 127.0.0.1:5432 0.0.0.0:*\n".to_string(),
                exit_status: 0,
            })
        }
    }

    struct NoDetails;

    impl DetailSource for NoDetails {
        fn details(&self, _pids: &[u32]) -> HashMap<u32, ProcessDetails> {
            HashMap::new()
        }
    }

    /// A process that ignores SIGTERM and dies on SIGKILL.
    struct IgnoresTerm {
        alive: Mutex<bool>,
        sent: Mutex<Vec<(u32, SignalKind)>>,
    }

    impl IgnoresTerm {
        fn new() -> Self {
            Self {
                alive: Mutex::new(true),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl SignalPort for IgnoresTerm {
        fn send(&self, pid: u32, kind: SignalKind) -> Result<Delivery> {
            self.sent.lock().unwrap().push((pid, kind));
            if kind == SignalKind::Forced {
                *self.alive.lock().unwrap() = false;
            }
            Ok(Delivery::Delivered)
        }

        fn is_alive(&self, _pid: u32) -> bool {
            *self.alive.lock().unwrap()
        }
    }

    struct Yes;

    impl Confirmer for Yes {
        async fn confirm(&self, _target: &PortProcess) -> bool {
            true
        }
    }

    fn service() -> PortService<CannedProbe, NoDetails> {
        PortService::new(CannedProbe, NoDetails)
    }

    #[tokio::test]
    async fn test_who_and_free() {
        let service = service();

        let owner = service.find_owner(3000).await.unwrap().unwrap();
        assert_eq!(owner.pid, 12345);
        assert_eq!(owner.owner.as_deref(), Some("alice"));
        assert_eq!(owner.process_name, "node");

        assert!(!service.is_free(3000).await.unwrap());
        assert!(service.is_free(3001).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_kill_without_force_leaves_it_running() {
        let terminator = Terminator::new(IgnoresTerm::new(), KillOptions::default());
        let report = terminator
            .kill_port(&service(), 3000, &Yes, &CancelToken::new())
            .await
            .unwrap();

        assert_eq!(report.outcome, KillOutcome::StillRunning);
        assert_eq!(
            *terminator.signals().sent.lock().unwrap(),
            vec![(12345, SignalKind::Graceful)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_kill_yes_force_terminates() {
        let options = KillOptions::default().with_assume_yes(true).with_force(true);
        let terminator = Terminator::new(IgnoresTerm::new(), options);
        let report = terminator
            .kill_port(&service(), 3000, &Yes, &CancelToken::new())
            .await
            .unwrap();

        assert_eq!(report.outcome, KillOutcome::Terminated);
        assert!(report.trail.contains(&KillState::SignalSent(SignalKind::Forced)));
        assert_eq!(
            *terminator.signals().sent.lock().unwrap(),
            vec![(12345, SignalKind::Graceful), (12345, SignalKind::Forced)]
        );
    }

    #[tokio::test]
    async fn test_kill_free_port_is_nothing_to_kill() {
        let terminator = Terminator::new(IgnoresTerm::new(), KillOptions::default());
        let report = terminator
            .kill_port(&service(), 4000, &Yes, &CancelToken::new())
            .await
            .unwrap();

        assert_eq!(report.outcome, KillOutcome::NothingToKill);
        assert!(terminator.signals().sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_kill_hidden_owner_is_an_error() {
        let service = PortService::new(UnprivilegedProbe, NoDetails);
        let terminator = Terminator::new(IgnoresTerm::new(), KillOptions::default());

        let result = terminator
            .kill_port(&service, 5432, &Yes, &CancelToken::new())
            .await;

        assert!(matches!(result, Err(crate::error::Error::PermissionDenied(_))));
        assert!(terminator.signals().sent.lock().unwrap().is_empty());
    }
}
