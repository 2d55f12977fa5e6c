//! portctl core library
//!
//! Finds out which process owns a TCP listening port, explains how that was
//! determined, and terminates the owner safely.
//!
//! - Probe the OS with its native socket introspection tool
//! - Normalize the tool's text output into [`PortProcess`] records
//! - Answer "who owns port N", "is port N free" and "list all listeners"
//! - Drive an escalating termination (SIGTERM, grace wait, optional SIGKILL)
//! - Explain the exact native commands behind each operation
//!
//! # Architecture
//! Ports & adapters:
//! - `domain`: data model and small pure helpers
//! - `ports`: capability traits (probe, signals, process details, confirmation)
//! - `adapters`: OS-backed implementations of those traits
//! - `parser`: raw tool text to records, no I/O
//! - `application`: the query service and the termination state machine
//! - `explain`: static registry of the commands each operation runs
//!
//! # Platform Support
//! - macOS: `lsof`
//! - Linux: `ss` (iproute2)

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod explain;
pub mod parser;
pub mod ports;

pub use adapters::{NixSignals, SysinfoDetails, SystemProbe};
pub use application::{
    CancelToken, KillEvent, KillOptions, KillReport, KillState, PortService, Step, Terminator,
    MAX_WAIT,
};
pub use config::{Config, ConfigStore};
pub use domain::{
    KillOutcome, ListeningPortSet, Operation, Platform, PortProcess, ProcessDetails, SignalKind,
};
pub use error::{Error, Result};
pub use explain::{explain, ExplainEntry, FlagNote};
pub use ports::{Confirmer, Delivery, DetailSource, ProbePort, ProbeQuery, RawOutput, SignalPort};
