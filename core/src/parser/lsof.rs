//! `lsof` output grammar (macOS).
//!
//! ```text
//! COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
//! node     34805  code   19u  IPv6 0x3d8015e195af1f3f      0t0  TCP [::1]:3000 (LISTEN)
//! ```

use tracing::debug;

use crate::domain::PortProcess;

use super::address::split_host_port;
use super::Dedup;

const MIN_COLUMNS: usize = 9;

/// Parse `lsof -nP -iTCP... -sTCP:LISTEN` output.
pub fn parse(output: &str) -> Vec<PortProcess> {
    let mut dedup = Dedup::default();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("COMMAND") {
            continue;
        }

        let components: Vec<&str> = line.split_whitespace().collect();
        if components.len() < MIN_COLUMNS {
            debug!(line, "skipping short lsof line");
            continue;
        }

        let pid = match components[1].parse::<u32>() {
            Ok(p) if p > 0 => p,
            _ => {
                debug!(line, "skipping lsof line with unparsable PID");
                continue;
            }
        };

        // State is reported in parentheses after NAME; anything but LISTEN is a connection.
        if let Some(state) = components.last().filter(|c| c.starts_with('(')) {
            if *state != "(LISTEN)" {
                debug!(line, "skipping non-LISTEN lsof line");
                continue;
            }
        }

        // Search backwards for the NAME column, skipping DEVICE and SIZE/OFF values
        let Some((address, port)) = components[MIN_COLUMNS - 1..]
            .iter()
            .rev()
            .filter(|c| c.contains(':') && !c.starts_with("0x") && !c.starts_with("0t"))
            .find_map(|c| split_host_port(c))
        else {
            debug!(line, "skipping lsof line without a listening address");
            continue;
        };

        let owner = components[2];
        let mut record = PortProcess::new(port, pid, unescape(components[0]), address);
        if !owner.is_empty() {
            record = record.with_owner(owner);
        }
        dedup.push(record);
    }

    dedup.into_records()
}

/// Decode lsof's `\xHH` escapes in COMMAND (e.g. `Code\x20Helper`).
fn unescape(name: &str) -> String {
    let mut bytes = Vec::with_capacity(name.len());
    let raw = name.as_bytes();
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'\\' && raw.get(i + 1) == Some(&b'x') && i + 4 <= raw.len() {
            let hex = std::str::from_utf8(&raw[i + 2..i + 4]).ok();
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                bytes.push(byte);
                i += 4;
                continue;
            }
        }
        bytes.push(raw[i]);
        i += 1;
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME";

    #[test]
    fn test_parse_lsof_output() {
        let output = format!(
            "{HEADER}\n\
node     34805  code   19u  IPv6 0x3d8015e195af1f3f      0t0  TCP [::1]:3000 (LISTEN)\n\
nginx        1  root    6u  IPv4 0x1234567890abcdef      0t0  TCP *:80 (LISTEN)\n"
        );

        let records = parse(&output);
        assert_eq!(records.len(), 2);

        // Tool order is preserved
        assert_eq!(records[0].port, 3000);
        assert_eq!(records[0].pid, 34805);
        assert_eq!(records[0].process_name, "node");
        assert_eq!(records[0].address, "[::1]");
        assert_eq!(records[0].owner.as_deref(), Some("code"));

        assert_eq!(records[1].port, 80);
        assert_eq!(records[1].process_name, "nginx");
        assert_eq!(records[1].address, "*");
    }

    #[test]
    fn test_unescape_process_name() {
        let output = format!(
            "{HEADER}\n\
Code\\x20Helper  1234  user   10u  IPv4 0x1234567890abcdef      0t0  TCP *:3000 (LISTEN)\n"
        );

        let records = parse(&output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].process_name, "Code Helper");
    }

    #[test]
    fn test_unescape_leaves_plain_backslashes() {
        assert_eq!(unescape("a\\xZZb"), "a\\xZZb");
        assert_eq!(unescape("tail\\x"), "tail\\x");
        assert_eq!(unescape("x\\x2fy"), "x/y");
    }

    #[test]
    fn test_deduplication() {
        // Same port and PID reported once per socket family
        let output = format!(
            "{HEADER}\n\
node     1234  code   19u  IPv4 0x1234567890abcdef      0t0  TCP 127.0.0.1:3000 (LISTEN)\n\
node     1234  code   20u  IPv6 0xfedcba0987654321      0t0  TCP [::1]:3000 (LISTEN)\n"
        );

        let records = parse(&output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address, "127.0.0.1");
    }

    #[test]
    fn test_malformed_lines_are_isolated() {
        let output = format!(
            "{HEADER}\n\
node     notapid  code   19u  IPv4 0x1  0t0  TCP *:3000 (LISTEN)\n\
garbage\n\
postgres   511  alice    7u  IPv4 0x2  0t0  TCP 127.0.0.1:5432 (LISTEN)\n\
node     777  code   19u  IPv4 0x3  0t0  TCP 127.0.0.1:3000->127.0.0.1:51234 (ESTABLISHED)\n\
redis      0  alice    6u  IPv4 0x4  0t0  TCP *:6379 (LISTEN)\n\
ruby      9001  alice   12u  IPv4 0x5  0t0  TCP *:4567 (LISTEN)\n"
        );

        let records = parse(&output);
        let ports: Vec<u16> = records.iter().map(|r| r.port).collect();
        assert_eq!(ports, vec![5432, 4567]);
        assert_eq!(records[0].pid, 511);
        assert_eq!(records[1].pid, 9001);
    }

    #[test]
    fn test_empty_output() {
        assert!(parse("").is_empty());
        assert!(parse(HEADER).is_empty());
    }
}
