//! Adapters layer - External system implementations.
//!
//! This module contains implementations of the port traits defined in `ports`.
//! Each adapter handles communication with the operating system.

pub mod details;
pub mod probe;
pub mod signal;

// Re-export main types for convenience
pub use details::SysinfoDetails;
pub use probe::{command_line, SystemProbe};
pub use signal::NixSignals;
