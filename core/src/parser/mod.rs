//! Record parser - native tool text to [`PortProcess`] records.
//!
//! Pure functions, no I/O. Malformed lines are skipped with a debug note;
//! parsing never fails as a whole.

mod address;
mod lsof;
mod ss;

use std::collections::HashSet;

use crate::domain::{Platform, PortProcess};

pub use address::split_host_port;

/// Parsed probe output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Listening sockets with a known owning process.
    pub records: Vec<PortProcess>,
    /// Ports with a listening socket whose owner the tool did not reveal,
    /// typically another user's socket seen without root.
    pub unresolved: Vec<u16>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.unresolved.is_empty()
    }
}

/// Parse raw probe output for the given platform.
///
/// Output order follows the tool's order; (port, pid) duplicates keep the
/// first occurrence.
pub fn parse(raw: &str, platform: Platform) -> Listing {
    match platform {
        Platform::MacOs => Listing {
            records: lsof::parse(raw),
            unresolved: Vec::new(),
        },
        Platform::Linux => ss::parse(raw),
    }
}

/// Order-preserving (port, pid) deduplication.
#[derive(Default)]
struct Dedup {
    seen: HashSet<(u16, u32)>,
    records: Vec<PortProcess>,
}

impl Dedup {
    fn push(&mut self, record: PortProcess) {
        if self.seen.insert((record.port, record.pid)) {
            self.records.push(record);
        }
    }

    fn into_records(self) -> Vec<PortProcess> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_platform() {
        let lsof = "COMMAND PID USER FD TYPE DEVICE SIZE/OFF NODE NAME\n\
node 12345 alice 19u IPv4 0x1 0t0 TCP *:3000 (LISTEN)\n";
        let ss = r#"LISTEN 0 511 *:3000 *:* users:(("node",pid=12345,fd=19))"#;

        let mac = parse(lsof, Platform::MacOs);
        let linux = parse(ss, Platform::Linux);
        assert_eq!(mac.records.len(), 1);
        assert_eq!(linux.records.len(), 1);
        assert_eq!(
            (mac.records[0].port, mac.records[0].pid),
            (linux.records[0].port, linux.records[0].pid)
        );

        // Each grammar rejects the other's text rather than misreading it
        assert!(parse(lsof, Platform::Linux).is_empty());
        assert!(parse(ss, Platform::MacOs).is_empty());
    }
}
