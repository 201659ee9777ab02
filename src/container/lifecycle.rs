//! Live apply of a composed topology

use super::config::ContainerSpec;
use super::runtime::ContainerRuntime;
use crate::compose::Topology;
use crate::error::{DenError, Result};

/// A created and started service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHandle {
    pub service: String,
    pub container_id: String,
}

/// Realizes a topology against a container runtime
pub struct RuntimeApplier<R> {
    runtime: R,
}

impl<R: ContainerRuntime> RuntimeApplier<R> {
    pub fn new(runtime: R) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Create and start every service in topology order.
    ///
    /// Staged files must already be on disk. Services started before a
    /// failure keep running; their ids are carried in [`DenError::Apply`].
    pub async fn apply(&self, topology: &Topology) -> Result<Vec<ServiceHandle>> {
        let ctx = &topology.context;
        self.runtime
            .ensure_network(&ctx.network, ctx.platform.network_driver())
            .await?;

        let mut handles: Vec<ServiceHandle> = Vec::with_capacity(topology.descriptors.len());
        for descriptor in &topology.descriptors {
            let spec = ContainerSpec::from_descriptor(descriptor, ctx);

            match self.apply_one(&spec).await {
                Ok(container_id) => {
                    tracing::info!("Started {} ({})", descriptor.name, container_id);
                    handles.push(ServiceHandle {
                        service: descriptor.name.clone(),
                        container_id,
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to apply {}: {}", descriptor.name, e);
                    return Err(DenError::Apply {
                        service: descriptor.name.clone(),
                        applied: handles.into_iter().map(|h| h.container_id).collect(),
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(handles)
    }

    async fn apply_one(&self, spec: &ContainerSpec) -> Result<String> {
        self.runtime.pull_image(&spec.image).await?;
        let id = self.runtime.create_container(spec).await?;
        self.runtime.start_container(&id).await?;
        Ok(id)
    }
}
