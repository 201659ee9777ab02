//! Deployment configuration store

use super::model::DeploymentConfig;
use crate::error::{DenError, Result};
use std::path::{Path, PathBuf};

/// Configuration file name inside a deployment home
pub const CONFIG_FILE: &str = "den.yml";

/// Environment variable naming the deployment home
pub const DEN_HOME_ENV: &str = "DEN_HOME";

/// Reads and writes the deployment configuration under a home directory
#[derive(Debug, Clone)]
pub struct ConfigStore {
    home: PathBuf,
}

impl ConfigStore {
    /// Open a store rooted at `home`
    pub fn open(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Resolve the deployment home: explicit path, then `DEN_HOME`, then the
    /// current directory
    pub fn resolve_home(explicit: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path);
        }

        match std::env::var(DEN_HOME_ENV) {
            Ok(home) if !home.is_empty() => Ok(PathBuf::from(home)),
            _ => Ok(std::env::current_dir()?),
        }
    }

    /// Path of the configuration file
    pub fn path(&self) -> PathBuf {
        self.home.join(CONFIG_FILE)
    }

    /// Load the configuration
    pub fn load(&self) -> Result<DeploymentConfig> {
        let path = self.path();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            DenError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_str(&content)
    }

    /// Parse a configuration document
    pub fn parse_str(content: &str) -> Result<DeploymentConfig> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Persist the configuration
    pub fn store(&self, config: &DeploymentConfig) -> Result<()> {
        std::fs::create_dir_all(&self.home)?;
        let content = serde_yaml::to_string(config)?;
        std::fs::write(self.path(), content)?;
        tracing::debug!("Stored configuration at {}", self.path().display());
        Ok(())
    }

    /// Read a web certificate and its private key from `folder` and store them
    /// in the proxy section
    pub fn set_web_certificate(
        &self,
        folder: &Path,
        certificate_file: &str,
        private_key_file: &str,
    ) -> Result<DeploymentConfig> {
        let mut config = self.load()?;

        let cert_path = folder.join(certificate_file);
        let key_path = folder.join(private_key_file);
        config.proxy.certificate = std::fs::read_to_string(&cert_path).map_err(|e| {
            DenError::Config(format!("Failed to read {}: {}", cert_path.display(), e))
        })?;
        config.proxy.private_key = std::fs::read_to_string(&key_path).map_err(|e| {
            DenError::Config(format!("Failed to read {}: {}", key_path.display(), e))
        })?;

        self.store(&config)?;
        tracing::info!("Web certificate updated from {}", folder.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_and_load() {
        let temp = tempdir().unwrap();
        let store = ConfigStore::open(temp.path());

        let mut config = DeploymentConfig::default();
        config.server.external_url = "https://den.example.com".to_string();
        config.directory.username = "admin".to_string();
        store.store(&config).unwrap();

        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = tempdir().unwrap();
        let store = ConfigStore::open(temp.path().join("absent"));
        assert!(matches!(store.load(), Err(DenError::Config(_))));
    }

    #[test]
    fn test_set_web_certificate() {
        let temp = tempdir().unwrap();
        let store = ConfigStore::open(temp.path());
        store.store(&DeploymentConfig::default()).unwrap();

        let certs = temp.path().join("certs");
        std::fs::create_dir_all(&certs).unwrap();
        std::fs::write(certs.join("web.crt"), "CERT").unwrap();
        std::fs::write(certs.join("web.key"), "KEY").unwrap();

        let config = store.set_web_certificate(&certs, "web.crt", "web.key").unwrap();
        assert_eq!(config.proxy.certificate, "CERT");
        assert_eq!(config.proxy.private_key, "KEY");
        assert!(store.load().unwrap().proxy.has_tls());
    }

    #[test]
    fn test_resolve_explicit_home() {
        let home = ConfigStore::resolve_home(Some(PathBuf::from("/srv/den"))).unwrap();
        assert_eq!(home, PathBuf::from("/srv/den"));
    }
}
