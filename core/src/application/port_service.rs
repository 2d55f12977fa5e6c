//! Port query application service.

use tracing::{debug, warn};

use crate::domain::{ListeningPortSet, PortProcess};
use crate::error::{Error, Result};
use crate::parser::{self, Listing};
use crate::ports::{DetailSource, ProbePort, ProbeQuery};

/// Application service answering "who owns port N" and "what is listening".
///
/// Every call probes the OS afresh; nothing is cached, so two calls may
/// disagree if sockets open or close in between.
pub struct PortService<P: ProbePort, D: DetailSource> {
    probe: P,
    details: D,
}

impl<P: ProbePort, D: DetailSource> PortService<P, D> {
    /// Create a new port service from a probe and a detail source.
    pub fn new(probe: P, details: D) -> Self {
        Self { probe, details }
    }

    /// Run the probe and parse its output.
    async fn snapshot(&self, query: ProbeQuery) -> Result<Listing> {
        let raw = self.probe.probe(query).await?;
        Ok(parser::parse(&raw.text, self.probe.platform()))
    }

    fn enrich(&self, records: &mut [PortProcess]) {
        let mut pids: Vec<u32> = records.iter().map(|r| r.pid).collect();
        pids.sort_unstable();
        pids.dedup();

        let details = self.details.details(&pids);
        for record in records.iter_mut() {
            match details.get(&record.pid) {
                Some(found) => record.enrich(found.clone()),
                None => debug!(pid = record.pid, "no extra details resolved"),
            }
        }
    }

    /// Every distinct process listening on `port`, in tool order.
    ///
    /// Fails with [`Error::PermissionDenied`] when a listener exists but the
    /// tool would not name any owner; the port is taken, just not by anyone
    /// this user can see.
    pub async fn find_all_owners(&self, port: u16) -> Result<Vec<PortProcess>> {
        validate_port(port)?;
        let listing = self.snapshot(ProbeQuery::Port(port)).await?;
        let hidden = listing.unresolved.contains(&port);
        let mut owners: Vec<PortProcess> = listing
            .records
            .into_iter()
            .filter(|record| record.port == port)
            .collect();

        if owners.is_empty() && hidden {
            return Err(Error::PermissionDenied(format!(
                "port {} has a listener owned by another user; re-run as root to identify it",
                port
            )));
        }
        if hidden {
            warn!(port, "some listeners on this port have no visible owner");
        }

        self.enrich(&mut owners);
        Ok(owners)
    }

    /// The process listening on `port`, or `None` if the port is free.
    ///
    /// Dual-stack listeners collapse by PID; when different PIDs share the
    /// port, the first one the tool reports wins.
    pub async fn find_owner(&self, port: u16) -> Result<Option<PortProcess>> {
        let owners = self.find_all_owners(port).await?;
        if owners.len() > 1 {
            warn!(
                port,
                count = owners.len(),
                "several processes listen on this port, using the first"
            );
        }
        Ok(owners.into_iter().next())
    }

    /// Whether nothing is listening on `port`.
    pub async fn is_free(&self, port: u16) -> Result<bool> {
        Ok(self.find_owner(port).await?.is_none())
    }

    /// Every listening TCP socket on the system, in tool order.
    pub async fn list_all(&self) -> Result<ListeningPortSet> {
        let Listing {
            mut records,
            unresolved,
        } = self.snapshot(ProbeQuery::All).await?;
        if !unresolved.is_empty() {
            warn!(
                ports = ?unresolved,
                "listeners without a visible owner are omitted; re-run as root to include them"
            );
        }
        self.enrich(&mut records);
        Ok(records)
    }
}

fn validate_port(port: u16) -> Result<()> {
    if port == 0 {
        return Err(Error::InvalidPort(0));
    }
    Ok(())
}
