//! Process detail port (interface).

use std::collections::HashMap;

use crate::domain::ProcessDetails;

/// Port for resolving per-process fields the socket tool does not report.
///
/// Resolution is best effort: unknown PIDs are simply absent from the map.
pub trait DetailSource: Send + Sync {
    fn details(&self, pids: &[u32]) -> HashMap<u32, ProcessDetails>;
}
