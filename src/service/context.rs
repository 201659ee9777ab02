//! Per-composition topology context

use crate::config::Platform;
use std::path::PathBuf;

/// Default container network shared by every service
pub const DEFAULT_NETWORK: &str = "den-network";

/// Values shared by all factories during one composition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyContext {
    /// Deployment root; staging directories live directly under it
    pub base_path: PathBuf,
    /// Target platform, selects in-container path conventions
    pub platform: Platform,
    /// Container network name
    pub network: String,
}

impl TopologyContext {
    /// Create a context on the default network
    pub fn new(base_path: PathBuf, platform: Platform) -> Self {
        Self {
            base_path,
            platform,
            network: DEFAULT_NETWORK.to_string(),
        }
    }

    /// Host directory a service stages its files into
    pub fn staging_dir(&self, dir: &str) -> PathBuf {
        self.base_path.join(dir)
    }

    /// Host directory as a mount source string
    pub fn host_path(&self, dir: &str) -> String {
        self.staging_dir(dir).display().to_string()
    }
}
