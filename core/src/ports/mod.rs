//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with external systems. Implementations live in `adapters`.

mod confirm;
mod details;
mod probe;
mod signal;

pub use confirm::Confirmer;
pub use details::DetailSource;
pub use probe::{ProbePort, ProbeQuery, RawOutput};
pub use signal::{Delivery, SignalPort};
