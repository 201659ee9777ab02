//! Docker Compose file types
//!
//! Only the subset a rendered deployment uses. Maps are `BTreeMap` so the
//! rendered document is byte-stable.

use crate::service::{ServiceDescriptor, TopologyContext};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Compose file format version
pub const COMPOSE_VERSION: &str = "3.8";

/// Docker Compose file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// Compose file version
    pub version: String,
    /// Services
    pub services: BTreeMap<String, ServiceConfig>,
    /// Networks
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub networks: BTreeMap<String, NetworkConfig>,
    /// Named volumes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub volumes: BTreeMap<String, VolumeConfig>,
}

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Image name
    pub image: String,
    /// Container name
    pub container_name: String,
    /// Environment variables as `KEY=value`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<String>,
    /// Ports exposed on the service network only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expose: Vec<String>,
    /// Port mappings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    /// Volume mounts as `source:target[:mode]`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    /// Command to run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Healthcheck configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<HealthcheckConfig>,
    /// Networks to connect to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
    /// Restart policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart: Option<String>,
}

/// Healthcheck configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthcheckConfig {
    /// Test command
    pub test: Vec<String>,
    /// Interval
    pub interval: String,
    /// Timeout
    pub timeout: String,
    /// Retries
    pub retries: u32,
}

impl HealthcheckConfig {
    /// Shell-form probe with the deployment's default timings
    pub fn shell(probe: &str) -> Self {
        Self {
            test: vec!["CMD-SHELL".to_string(), probe.to_string()],
            interval: "5s".to_string(),
            timeout: "2s".to_string(),
            retries: 5,
        }
    }
}

/// Network configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Driver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
}

/// Volume configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Driver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
}

impl ServiceConfig {
    /// Service block for one descriptor
    pub fn from_descriptor(descriptor: &ServiceDescriptor, ctx: &TopologyContext) -> Self {
        let (ports, expose): (Vec<_>, Vec<_>) =
            descriptor.ports.iter().partition(|p| p.host.is_some());

        Self {
            image: descriptor.image.clone(),
            container_name: descriptor.name.clone(),
            environment: descriptor.env.to_pairs(),
            expose: expose.iter().map(|p| p.to_compose()).collect(),
            ports: ports.iter().map(|p| p.to_compose()).collect(),
            volumes: descriptor.volumes.iter().map(|m| m.to_bind()).collect(),
            command: descriptor.command.clone(),
            healthcheck: descriptor
                .health_check
                .as_deref()
                .map(HealthcheckConfig::shell),
            networks: vec![ctx.network.clone()],
            restart: Some("on-failure".to_string()),
        }
    }
}

impl ComposeConfig {
    /// Compose file for a descriptor set
    pub fn from_descriptors(descriptors: &[ServiceDescriptor], ctx: &TopologyContext) -> Self {
        let mut services = BTreeMap::new();
        let mut volumes = BTreeMap::new();
        for descriptor in descriptors {
            services.insert(
                descriptor.name.clone(),
                ServiceConfig::from_descriptor(descriptor, ctx),
            );
            for volume in descriptor.named_volumes() {
                volumes.insert(volume.to_string(), VolumeConfig::default());
            }
        }

        let mut networks = BTreeMap::new();
        networks.insert(
            ctx.network.clone(),
            NetworkConfig {
                driver: Some(ctx.platform.network_driver().to_string()),
            },
        );

        Self {
            version: COMPOSE_VERSION.to_string(),
            services,
            networks,
            volumes,
        }
    }
}
