//! Platform probe port (interface).

use crate::domain::Platform;
use crate::error::Result;

/// What the probe should ask the native tool for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeQuery {
    /// LISTEN-state TCP sockets on one port.
    Port(u16),
    /// Every LISTEN-state TCP socket on the system.
    All,
}

/// Unparsed output of one native tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    /// The tool's stdout.
    pub text: String,
    /// The tool's exit status (`-1` when terminated by a signal).
    pub exit_status: i32,
}

/// Port for running the native socket introspection tool.
///
/// Implementations return raw text only; parsing happens in `crate::parser`.
/// A non-zero exit with nothing on stderr is "nothing found", not an error.
pub trait ProbePort: Send + Sync {
    /// The platform whose output grammar `probe` produces.
    fn platform(&self) -> Platform;

    /// Run the tool once for the given query.
    fn probe(&self, query: ProbeQuery)
        -> impl std::future::Future<Output = Result<RawOutput>> + Send;
}
