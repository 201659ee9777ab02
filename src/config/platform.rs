//! Target platform and its mount-path conventions

use serde::{Deserialize, Serialize};

/// Container host platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Linux containers
    #[default]
    Linux,
    /// Windows containers
    Windows,
}

impl Platform {
    /// Directory a service's staged files are mounted at inside its container
    pub fn mount_root(&self, service: &str) -> String {
        match self {
            Platform::Linux => format!("/etc/{}", service),
            Platform::Windows => format!("c:\\{}", service),
        }
    }

    /// Database data directory inside the database container
    pub fn data_dir(&self) -> &'static str {
        match self {
            Platform::Linux => "/data/db",
            Platform::Windows => "c:\\data\\db",
        }
    }

    /// Container network driver
    pub fn network_driver(&self) -> &'static str {
        match self {
            Platform::Linux => "bridge",
            Platform::Windows => "nat",
        }
    }

    /// Path separator used inside containers of this platform
    pub fn separator(&self) -> char {
        match self {
            Platform::Linux => '/',
            Platform::Windows => '\\',
        }
    }

    /// Join a file name onto an in-container directory
    pub fn join(&self, dir: &str, file: &str) -> String {
        let sep = self.separator();
        format!("{}{}{}", dir.trim_end_matches(sep), sep, file)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_root() {
        assert_eq!(Platform::Linux.mount_root("traefik"), "/etc/traefik");
        assert_eq!(Platform::Windows.mount_root("traefik"), "c:\\traefik");
    }

    #[test]
    fn test_join_uses_platform_separator() {
        assert_eq!(
            Platform::Linux.join("/etc/den-server", "den-server.key"),
            "/etc/den-server/den-server.key"
        );
        assert_eq!(
            Platform::Windows.join("c:\\den-server\\", "den-server.key"),
            "c:\\den-server\\den-server.key"
        );
    }
}
