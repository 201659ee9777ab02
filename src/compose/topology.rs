//! Topology composition and secret staging

use crate::config::DeploymentConfig;
use crate::error::{DenError, Result};
use crate::routing::RoutingDocument;
use crate::service::{default_factories, ServiceDescriptor, ServiceFactory, TopologyContext};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A composed deployment: the context it was built for and one descriptor per
/// service
#[derive(Debug, Clone)]
pub struct Topology {
    pub context: TopologyContext,
    pub descriptors: Vec<ServiceDescriptor>,
}

impl Topology {
    /// Look up a descriptor by logical name
    pub fn get(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Routing document for this topology
    pub fn routing(&self) -> Result<RoutingDocument> {
        RoutingDocument::from_descriptors(&self.descriptors)
    }

    /// Write every staged file to disk.
    ///
    /// Each owned staging directory is deleted and recreated so nothing from a
    /// previous configuration survives. A failure between delete and create
    /// leaves the directory absent.
    pub fn materialize(&self) -> Result<()> {
        let routing = self.routing()?.to_toml()?;

        for descriptor in &self.descriptors {
            let Some(dir_name) = &descriptor.secret_dir else {
                continue;
            };

            let dir = self.context.staging_dir(dir_name);
            recreate_dir(&dir)?;

            for secret in &descriptor.secrets {
                write_staged(&dir.join(&secret.file_name), &secret.contents)?;
            }

            if let Some(gateway) = &descriptor.gateway {
                write_staged(&dir.join(&gateway.config_file), &routing)?;
            }

            tracing::debug!(
                "Staged {} file(s) for {} in {}",
                descriptor.secrets.len(),
                descriptor.name,
                dir.display()
            );
        }

        Ok(())
    }
}

fn recreate_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|e| DenError::staging(dir, e))?;
    }
    std::fs::create_dir_all(dir).map_err(|e| DenError::staging(dir, e))
}

fn write_staged(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| DenError::staging(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| DenError::staging(path, e))?;
    }

    Ok(())
}

/// Runs every registered factory against one deployment root
pub struct Composer {
    base_path: PathBuf,
    factories: Vec<Box<dyn ServiceFactory>>,
}

impl Composer {
    /// Composer for the full deployment rooted at `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self::with_factories(base_path, default_factories())
    }

    /// Composer with an explicit factory set
    pub fn with_factories(
        base_path: impl Into<PathBuf>,
        factories: Vec<Box<dyn ServiceFactory>>,
    ) -> Self {
        Self {
            base_path: base_path.into(),
            factories,
        }
    }

    /// Build every descriptor. Pure: nothing is written to disk.
    pub fn compose(&self, config: &DeploymentConfig) -> Result<Topology> {
        let context = TopologyContext::new(self.base_path.clone(), config.platform);
        tracing::info!(
            "Composing {} services for {} at {}",
            self.factories.len(),
            context.platform,
            context.base_path.display()
        );

        let mut names = HashSet::new();
        let mut descriptors = Vec::with_capacity(self.factories.len());
        for factory in &self.factories {
            let descriptor = factory.build(config, &context)?;
            if !names.insert(descriptor.name.clone()) {
                return Err(DenError::DuplicateService(descriptor.name));
            }
            tracing::debug!(
                "Composed {} ({} env, {} mounts)",
                descriptor.name,
                descriptor.env.len(),
                descriptor.volumes.len()
            );
            descriptors.push(descriptor);
        }

        Ok(Topology {
            context,
            descriptors,
        })
    }

    /// Compose and write the staged files
    pub fn compose_and_stage(&self, config: &DeploymentConfig) -> Result<Topology> {
        let topology = self.compose(config)?;
        topology.materialize()?;
        Ok(topology)
    }
}
