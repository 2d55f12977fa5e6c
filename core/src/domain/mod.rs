//! Domain layer - Pure data models.
//!
//! This module contains the types every other layer exchanges.
//! These types have no I/O dependencies and can be tested in isolation.

mod kill;
mod platform;
mod process;

// Re-export all domain types
pub use kill::{KillOutcome, SignalKind};
pub use platform::{Operation, Platform};
pub use process::{ListeningPortSet, PortProcess, ProcessDetails};
