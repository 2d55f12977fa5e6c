//! Platform family and operation identifiers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Platform
// ============================================================================

/// Supported OS families, each with its own socket introspection tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// macOS, probed with `lsof`.
    MacOs,
    /// Linux, probed with `ss`.
    Linux,
}

impl Platform {
    /// All supported platforms.
    pub const ALL: [Platform; 2] = [Platform::MacOs, Platform::Linux];

    /// Detect the platform this binary runs on.
    pub fn detect() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier (as in `std::env::consts::OS`) to a platform.
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "macos" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            other => Err(Error::UnsupportedPlatform(format!(
                "{} (only macOS and Linux are supported)",
                other
            ))),
        }
    }

    /// Name of the native introspection binary.
    pub fn tool(&self) -> &'static str {
        match self {
            Platform::MacOs => "lsof",
            Platform::Linux => "ss",
        }
    }

    /// Get the display name for this platform.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "macos" | "darwin" | "mac" => Ok(Platform::MacOs),
            "linux" => Ok(Platform::Linux),
            other => Err(Error::UnsupportedPlatform(other.to_string())),
        }
    }
}

// ============================================================================
// Operation
// ============================================================================

/// User-facing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Who,
    List,
    Kill,
    Free,
}

impl Operation {
    /// All operations in display order.
    pub const ALL: [Operation; 4] = [
        Operation::Who,
        Operation::List,
        Operation::Kill,
        Operation::Free,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Who => "who",
            Operation::List => "list",
            Operation::Kill => "kill",
            Operation::Free => "free",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == wanted)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_from_os() {
        assert_eq!(Platform::from_os("macos").unwrap(), Platform::MacOs);
        assert_eq!(Platform::from_os("linux").unwrap(), Platform::Linux);
        assert!(matches!(
            Platform::from_os("windows"),
            Err(Error::UnsupportedPlatform(_))
        ));
    }

    #[test]
    fn test_platform_tool() {
        assert_eq!(Platform::MacOs.tool(), "lsof");
        assert_eq!(Platform::Linux.tool(), "ss");
    }

    #[test]
    fn test_operation_parse() {
        assert_eq!("who".parse::<Operation>().unwrap(), Operation::Who);
        assert_eq!(" KILL ".parse::<Operation>().unwrap(), Operation::Kill);
        match "nuke".parse::<Operation>() {
            Err(Error::UnknownOperation(name)) => assert_eq!(name, "nuke"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
