//! Termination controller.
//!
//! A port owner is taken through an explicit state machine:
//!
//! ```text
//! Located -> AwaitingConfirmation -> SignalSent(Graceful) -> GraceWait -> Verifying
//!     -> Terminated | StillRunning | Escalating -> SignalSent(Forced) -> GraceWait
//!     -> Verifying -> Terminated | Failed
//! ```
//!
//! [`KillState::next`] is the pure transition function; [`Terminator`] performs
//! the side effect of each state and feeds the resulting [`KillEvent`] back in.
//! The only edge into `SignalSent(Forced)` is from `Escalating`, and the only
//! edge into `Escalating` is a live process at `Verifying(Graceful)` with
//! `force` set.

use std::time::Duration;

use serde::Serialize;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::domain::{KillOutcome, PortProcess, SignalKind};
use crate::error::Result;
use crate::ports::{Confirmer, Delivery, DetailSource, ProbePort, SignalPort};

use super::{CancelToken, PortService};

/// Default wait between SIGTERM and deciding whether to escalate.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(3);
/// Default liveness polling interval during a wait.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Default wait after SIGKILL before declaring failure.
pub const DEFAULT_FORCE_WAIT: Duration = Duration::from_secs(1);
/// Longest wait a caller may configure for either signal.
pub const MAX_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

/// Caller options for a termination request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillOptions {
    /// Skip the confirmation prompt.
    pub assume_yes: bool,
    /// Allow SIGKILL if the process survives the grace period.
    pub force: bool,
    pub grace_period: Duration,
    pub poll_interval: Duration,
    pub force_wait: Duration,
}

impl Default for KillOptions {
    fn default() -> Self {
        Self {
            assume_yes: false,
            force: false,
            grace_period: DEFAULT_GRACE_PERIOD,
            poll_interval: DEFAULT_POLL_INTERVAL,
            force_wait: DEFAULT_FORCE_WAIT,
        }
    }
}

impl KillOptions {
    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// How long to wait after sending `kind`.
    fn wait_budget(&self, kind: SignalKind) -> Duration {
        match kind {
            SignalKind::Graceful => self.grace_period,
            SignalKind::Forced => self.force_wait,
        }
    }
}

// ============================================================================
// State machine
// ============================================================================

/// Non-terminal controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "state", content = "signal", rename_all = "camelCase")]
pub enum KillState {
    Located,
    AwaitingConfirmation,
    SignalSent(SignalKind),
    GraceWait(SignalKind),
    Verifying(SignalKind),
    Escalating,
}

/// What happened while the controller was in a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillEvent {
    /// Nothing to decide; move on.
    Proceed,
    /// The target must not be signalled.
    Refused(String),
    /// The operator answered the prompt.
    Confirmed(bool),
    Delivered,
    NoSuchProcess,
    DeliveryFailed(String),
    /// The process is gone.
    Exited,
    /// The wait budget ran out with the process still present.
    WaitElapsed,
    /// The liveness check found the process.
    StillAlive,
    /// The operator aborted.
    Interrupted,
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Next(KillState),
    Finish(KillOutcome),
}

impl KillState {
    /// Pure transition function.
    pub fn next(self, event: KillEvent, options: &KillOptions) -> Step {
        use KillEvent as E;
        use KillState as S;

        match (self, event) {
            (_, E::Interrupted) => Step::Finish(KillOutcome::Interrupted),

            (S::Located, E::Refused(reason)) => Step::Finish(KillOutcome::Failed { reason }),
            (S::Located, E::Proceed) if options.assume_yes => {
                Step::Next(S::SignalSent(SignalKind::Graceful))
            }
            (S::Located, E::Proceed) => Step::Next(S::AwaitingConfirmation),

            (S::AwaitingConfirmation, E::Confirmed(true)) => {
                Step::Next(S::SignalSent(SignalKind::Graceful))
            }
            (S::AwaitingConfirmation, E::Confirmed(false)) => Step::Finish(KillOutcome::Cancelled),

            (S::SignalSent(kind), E::Delivered) => Step::Next(S::GraceWait(kind)),
            // Someone else got there first
            (S::SignalSent(_), E::NoSuchProcess) => Step::Finish(KillOutcome::Terminated),
            (S::SignalSent(_), E::DeliveryFailed(reason)) => {
                Step::Finish(KillOutcome::Failed { reason })
            }

            (S::GraceWait(_), E::Exited) => Step::Finish(KillOutcome::Terminated),
            (S::GraceWait(kind), E::WaitElapsed) => Step::Next(S::Verifying(kind)),

            (S::Verifying(_), E::Exited) => Step::Finish(KillOutcome::Terminated),
            (S::Verifying(SignalKind::Graceful), E::StillAlive) if options.force => {
                Step::Next(S::Escalating)
            }
            (S::Verifying(SignalKind::Graceful), E::StillAlive) => {
                Step::Finish(KillOutcome::StillRunning)
            }
            (S::Verifying(SignalKind::Forced), E::StillAlive) => Step::Finish(KillOutcome::Failed {
                reason: "process survived SIGKILL".to_string(),
            }),

            (S::Escalating, E::Proceed) => Step::Next(S::SignalSent(SignalKind::Forced)),

            (state, event) => Step::Finish(KillOutcome::Failed {
                reason: format!("unexpected {:?} while {:?}", event, state),
            }),
        }
    }
}

/// Record of one termination request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KillReport {
    /// The snapshot that was acted on; `None` when nothing was listening.
    pub target: Option<PortProcess>,
    /// States visited, in order.
    pub trail: Vec<KillState>,
    /// Signals the OS accepted, in order.
    pub signals_sent: Vec<SignalKind>,
    #[serde(flatten)]
    pub outcome: KillOutcome,
}

// ============================================================================
// Terminator
// ============================================================================

/// Drives the termination state machine against real (or mocked) signals.
pub struct Terminator<S: SignalPort> {
    signals: S,
    options: KillOptions,
}

impl<S: SignalPort> Terminator<S> {
    pub fn new(signals: S, options: KillOptions) -> Self {
        Self { signals, options }
    }

    pub fn options(&self) -> &KillOptions {
        &self.options
    }

    pub fn signals(&self) -> &S {
        &self.signals
    }

    /// Locate the owner of `port` and terminate it.
    ///
    /// Probe failures abort before any signal is sent.
    pub async fn kill_port<P, D, C>(
        &self,
        service: &PortService<P, D>,
        port: u16,
        confirmer: &C,
        cancel: &CancelToken,
    ) -> Result<KillReport>
    where
        P: ProbePort,
        D: DetailSource,
        C: Confirmer,
    {
        let target = service.find_owner(port).await?;
        Ok(self.terminate(target, confirmer, cancel).await)
    }

    /// Run the state machine for an already located snapshot.
    pub async fn terminate<C: Confirmer>(
        &self,
        target: Option<PortProcess>,
        confirmer: &C,
        cancel: &CancelToken,
    ) -> KillReport {
        let Some(target) = target else {
            return KillReport {
                target: None,
                trail: Vec::new(),
                signals_sent: Vec::new(),
                outcome: KillOutcome::NothingToKill,
            };
        };

        let mut trail = Vec::new();
        let mut signals_sent = Vec::new();
        let mut state = KillState::Located;

        let outcome = loop {
            trail.push(state);
            let event = self
                .effect(state, &target, confirmer, cancel, &mut signals_sent)
                .await;
            debug!(pid = target.pid, ?state, ?event, "kill transition");

            match state.next(event, &self.options) {
                Step::Next(next) => state = next,
                Step::Finish(outcome) => break outcome,
            }
        };

        info!(pid = target.pid, port = target.port, %outcome, "kill finished");
        KillReport {
            target: Some(target),
            trail,
            signals_sent,
            outcome,
        }
    }

    /// Perform the side effect belonging to `state`.
    async fn effect<C: Confirmer>(
        &self,
        state: KillState,
        target: &PortProcess,
        confirmer: &C,
        cancel: &CancelToken,
        signals_sent: &mut Vec<SignalKind>,
    ) -> KillEvent {
        let pid = target.pid;
        match state {
            KillState::Located => match protected_reason(pid) {
                Some(reason) => KillEvent::Refused(reason),
                None => KillEvent::Proceed,
            },
            KillState::AwaitingConfirmation => {
                tokio::select! {
                    answer = confirmer.confirm(target) => KillEvent::Confirmed(answer),
                    _ = cancel.cancelled() => KillEvent::Interrupted,
                }
            }
            KillState::SignalSent(kind) => match self.signals.send(pid, kind) {
                Ok(Delivery::Delivered) => {
                    signals_sent.push(kind);
                    KillEvent::Delivered
                }
                Ok(Delivery::NoSuchProcess) => KillEvent::NoSuchProcess,
                Err(e) => KillEvent::DeliveryFailed(e.to_string()),
            },
            KillState::GraceWait(kind) => {
                self.wait_for_exit(pid, self.options.wait_budget(kind), cancel)
                    .await
            }
            KillState::Verifying(_) => {
                if self.signals.is_alive(pid) {
                    KillEvent::StillAlive
                } else {
                    KillEvent::Exited
                }
            }
            KillState::Escalating => {
                if cancel.is_cancelled() {
                    KillEvent::Interrupted
                } else {
                    KillEvent::Proceed
                }
            }
        }
    }

    /// Poll liveness until the process exits, the budget runs out, or the
    /// operator cancels.
    async fn wait_for_exit(&self, pid: u32, budget: Duration, cancel: &CancelToken) -> KillEvent {
        // A budget past the clock's range never elapses
        let deadline = Instant::now().checked_add(budget);
        loop {
            if !self.signals.is_alive(pid) {
                return KillEvent::Exited;
            }
            let now = Instant::now();
            let nap = match deadline {
                Some(deadline) if now >= deadline => return KillEvent::WaitElapsed,
                Some(deadline) => self.options.poll_interval.min(deadline - now),
                None => self.options.poll_interval,
            };
            tokio::select! {
                _ = sleep(nap) => {}
                _ = cancel.cancelled() => return KillEvent::Interrupted,
            }
        }
    }
}

/// PIDs that must never be signalled.
fn protected_reason(pid: u32) -> Option<String> {
    if pid == 1 {
        Some("refusing to signal PID 1 (init)".to_string())
    } else if pid == std::process::id() {
        Some("refusing to signal this tool's own process".to_string())
    } else {
        None
    }
}
