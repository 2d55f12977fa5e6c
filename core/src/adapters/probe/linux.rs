//! Linux probe command line (`ss`).

use crate::ports::ProbeQuery;

/// Build the `ss` argv for a query.
///
/// Flags:
/// -H, --no-header     Suppress header line
/// -t, --tcp           display only TCP sockets
/// -l, --listening     display listening sockets
/// -n, --numeric       don't resolve service names
/// -p, --processes     show process using socket
/// sport = :N          filter on local port
pub fn command_line(query: ProbeQuery) -> Vec<String> {
    let mut argv = vec!["ss".to_string(), "-Htlnp".to_string()];
    if let ProbeQuery::Port(port) = query {
        argv.push("sport".to_string());
        argv.push("=".to_string());
        argv.push(format!(":{}", port));
    }
    argv
}
