//! List command - show all listening ports.

use std::process::ExitCode;

use anyhow::{Context, Result};
use portctl_core::PortProcess;

use super::{port_service, print_json, EXIT_OK};
use crate::SortKey;

pub async fn run(sort: Option<SortKey>, name_filter: Option<String>, json: bool) -> Result<ExitCode> {
    let service = port_service()?;
    let mut ports = service
        .list_all()
        .await
        .context("could not list listening ports")?;

    if let Some(ref name) = name_filter {
        let name_lower = name.to_lowercase();
        ports.retain(|port| port.process_name.to_lowercase().contains(&name_lower));
    }
    if let Some(key) = sort {
        sort_ports(&mut ports, key);
    }

    if json {
        print_json(&ports)?;
        return Ok(ExitCode::from(EXIT_OK));
    }

    if ports.is_empty() {
        println!("No listening ports found.");
        return Ok(ExitCode::from(EXIT_OK));
    }

    // Table header
    println!(
        "{:<6} {:<8} {:<20} {:<12} {:<15} COMMAND",
        "PORT", "PID", "PROCESS", "USER", "ADDRESS"
    );
    println!("{}", "-".repeat(80));

    for port in &ports {
        println!(
            "{:<6} {:<8} {:<20} {:<12} {:<15} {}",
            port.port,
            port.pid,
            truncate(&port.process_name, 20),
            truncate(port.owner.as_deref().unwrap_or("-"), 12),
            truncate(&port.address, 15),
            truncate(port.command_or_name(), 40)
        );
    }

    println!("\nTotal: {} ports", ports.len());
    Ok(ExitCode::from(EXIT_OK))
}

/// Stable sort, so ties keep the tool's order.
fn sort_ports(ports: &mut [PortProcess], key: SortKey) {
    match key {
        SortKey::Port => ports.sort_by_key(|p| p.port),
        SortKey::Pid => ports.sort_by_key(|p| p.pid),
        SortKey::Name => ports.sort_by_key(|p| p.process_name.to_lowercase()),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 1).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("node", 20), "node");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("ñandú-server", 6), "ñandú…");
    }

    #[test]
    fn test_sort_is_stable() {
        let mut ports = vec![
            PortProcess::new(8080, 30, "nginx", "*"),
            PortProcess::new(3000, 20, "node", "*"),
            PortProcess::new(80, 30, "nginx", "*"),
        ];

        sort_ports(&mut ports, SortKey::Pid);
        let order: Vec<u16> = ports.iter().map(|p| p.port).collect();
        assert_eq!(order, vec![3000, 8080, 80]);

        sort_ports(&mut ports, SortKey::Port);
        let order: Vec<u16> = ports.iter().map(|p| p.port).collect();
        assert_eq!(order, vec![80, 3000, 8080]);
    }
}
