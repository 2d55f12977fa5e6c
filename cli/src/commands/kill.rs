//! Kill command - stop the process behind a port.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use portctl_core::{
    CancelToken, ConfigStore, KillOptions, KillOutcome, KillReport, NixSignals, SignalKind,
    Terminator, MAX_WAIT,
};

use super::{port_service, print_json, EXIT_INTERRUPTED, EXIT_NEGATIVE, EXIT_OK};
use crate::prompt::StdinConfirmer;

pub async fn run(
    port: u16,
    yes: bool,
    force: bool,
    grace: Option<f64>,
    json: bool,
) -> Result<ExitCode> {
    let store = ConfigStore::new()?;
    let config = store
        .load()
        .await
        .with_context(|| format!("could not load {}", store.path().display()))?;

    let mut options = config.kill_options().with_assume_yes(yes).with_force(force);
    if let Some(secs) = grace {
        options = options.with_grace_period(grace_period(secs)?);
    }

    let service = port_service()?;
    let terminator = Terminator::new(NixSignals::new(), options);

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    let report = terminator
        .kill_port(&service, port, &StdinConfirmer, &cancel)
        .await
        .with_context(|| format!("could not look up port {}", port))?;

    if json {
        print_json(&report)?;
    } else {
        print_report(port, &report, terminator.options());
    }

    let code = exit_status(&report.outcome);
    if report.outcome == KillOutcome::Interrupted {
        // A pending stdin read cannot be cancelled; do not wait for it on shutdown
        std::process::exit(i32::from(code));
    }
    Ok(ExitCode::from(code))
}

fn grace_period(secs: f64) -> Result<Duration> {
    let grace_period = Duration::try_from_secs_f64(secs)
        .map_err(|_| anyhow!("--grace must be a non-negative number of seconds"))?;
    if grace_period > MAX_WAIT {
        return Err(anyhow!(
            "--grace must be at most {} seconds",
            MAX_WAIT.as_secs()
        ));
    }
    Ok(grace_period)
}

fn exit_status(outcome: &KillOutcome) -> u8 {
    match outcome {
        KillOutcome::Terminated | KillOutcome::NothingToKill => EXIT_OK,
        KillOutcome::Interrupted => EXIT_INTERRUPTED,
        KillOutcome::Cancelled | KillOutcome::StillRunning | KillOutcome::Failed { .. } => {
            EXIT_NEGATIVE
        }
    }
}

fn print_report(port: u16, report: &KillReport, options: &KillOptions) {
    let target = match &report.target {
        Some(process) => process.to_string(),
        None => format!("port {}", port),
    };

    match &report.outcome {
        KillOutcome::NothingToKill => println!("Nothing is listening on port {}.", port),
        KillOutcome::Cancelled => println!("Cancelled; no signal sent."),
        KillOutcome::Terminated => {
            if report.signals_sent.contains(&SignalKind::Forced) {
                println!("Stopped {} with SIGKILL.", target);
            } else {
                println!("Stopped {}.", target);
            }
        }
        KillOutcome::StillRunning => println!(
            "{} is still running after {:.1}s; re-run with --force to send SIGKILL.",
            target,
            options.grace_period.as_secs_f64()
        ),
        KillOutcome::Failed { reason } => eprintln!("Could not stop {}: {}", target, reason),
        KillOutcome::Interrupted => {
            eprintln!("Interrupted; no further signals sent to {}.", target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grace_period_bounds() {
        assert_eq!(grace_period(1.5).unwrap(), Duration::from_millis(1500));
        assert_eq!(grace_period(0.0).unwrap(), Duration::ZERO);
        assert!(grace_period(-1.0).is_err());
        assert!(grace_period(f64::NAN).is_err());
        assert!(grace_period(1e19).is_err());
        assert!(grace_period(MAX_WAIT.as_secs_f64() + 1.0).is_err());
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(&KillOutcome::Terminated), 0);
        assert_eq!(exit_status(&KillOutcome::NothingToKill), 0);
        assert_eq!(exit_status(&KillOutcome::Cancelled), 1);
        assert_eq!(exit_status(&KillOutcome::StillRunning), 1);
        assert_eq!(
            exit_status(&KillOutcome::Failed {
                reason: "denied".to_string()
            }),
            1
        );
        assert_eq!(exit_status(&KillOutcome::Interrupted), 130);
    }
}
