//! macOS probe command line (`lsof`).

use crate::ports::ProbeQuery;

/// Build the `lsof` argv for a query.
///
/// Flags:
/// - -n: Show IP addresses (don't resolve to hostnames)
/// - -P: Show port numbers (don't resolve to service names)
/// - -iTCP[:port]: Only TCP sockets, optionally on one port
/// - -sTCP:LISTEN: Only listening sockets
pub fn command_line(query: ProbeQuery) -> Vec<String> {
    let inet = match query {
        ProbeQuery::Port(port) => format!("-iTCP:{}", port),
        ProbeQuery::All => "-iTCP".to_string(),
    };
    vec![
        "lsof".to_string(),
        "-nP".to_string(),
        inet,
        "-sTCP:LISTEN".to_string(),
    ]
}
