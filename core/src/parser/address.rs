/// Split a `host:port` token from socket tool output.
///
/// Handles the formats both tools print:
/// - IPv4: "127.0.0.1:3000" or "*:8080"
/// - IPv6: "\[::1]:3000" or "\[::ffff:127.0.0.1]:8080"
/// - Interface-scoped: "127.0.0.53%lo:53"
///
/// Returns `None` for connection tokens (`a->b`) and ports outside 1-65535.
pub fn split_host_port(token: &str) -> Option<(String, u16)> {
    if token.contains("->") {
        return None;
    }

    let last_colon = token.rfind(':')?;
    let host = &token[..last_colon];
    let port: u16 = token[last_colon + 1..].parse().ok()?;
    if port == 0 {
        return None;
    }

    if host.starts_with('[') && !host.ends_with(']') {
        return None;
    }

    let host = match host.find('%') {
        Some(scope) => &host[..scope],
        None => host,
    };
    let host = if host.is_empty() { "*" } else { host };
    Some((host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4_address() {
        let (addr, port) = split_host_port("127.0.0.1:3000").unwrap();
        assert_eq!(addr, "127.0.0.1");
        assert_eq!(port, 3000);

        let (addr, port) = split_host_port("*:8080").unwrap();
        assert_eq!(addr, "*");
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_ipv6_address() {
        let (addr, port) = split_host_port("[::1]:3000").unwrap();
        assert_eq!(addr, "[::1]");
        assert_eq!(port, 3000);

        let (addr, port) = split_host_port("[::ffff:127.0.0.1]:63342").unwrap();
        assert_eq!(addr, "[::ffff:127.0.0.1]");
        assert_eq!(port, 63342);
    }

    #[test]
    fn test_parse_scoped_address() {
        let (addr, port) = split_host_port("127.0.0.53%lo:53").unwrap();
        assert_eq!(addr, "127.0.0.53");
        assert_eq!(port, 53);
    }

    #[test]
    fn test_rejects_bad_tokens() {
        assert!(split_host_port("[::1]").is_none());
        assert!(split_host_port("*:*").is_none());
        assert!(split_host_port("*:0").is_none());
        assert!(split_host_port("*:70000").is_none());
        assert!(split_host_port("127.0.0.1:3000->127.0.0.1:51234").is_none());
    }
}
