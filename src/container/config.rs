//! Container create payload (Docker Engine API)

use crate::service::{ServiceDescriptor, TopologyContext};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label carrying the project name
pub const PROJECT_LABEL: &str = "com.docker.compose.project";

/// Label carrying the logical service name
pub const SERVICE_LABEL: &str = "com.docker.compose.service";

/// Project name used in container labels
pub const PROJECT_NAME: &str = "den";

/// Container configuration sent to `POST /containers/create`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSpec {
    /// Container name (query parameter, not part of the body)
    #[serde(skip)]
    pub name: String,
    /// Image name/tag
    pub image: String,
    /// Environment as `KEY=value`
    pub env: Vec<String>,
    /// Command to run
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub cmd: Vec<String>,
    /// Exposed ports, keyed `<port>/tcp`
    pub exposed_ports: BTreeMap<String, EmptyObject>,
    /// Health check
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub healthcheck: Option<HealthConfig>,
    /// Container labels
    pub labels: BTreeMap<String, String>,
    /// Host-side settings
    pub host_config: HostConfig,
}

/// `{}` in JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyObject {}

/// Health check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthConfig {
    pub test: Vec<String>,
}

/// Host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostConfig {
    /// Volume binds as `source:target[:mode]`
    pub binds: Vec<String>,
    /// Published ports
    pub port_bindings: BTreeMap<String, Vec<PortBinding>>,
    /// Network to attach to
    pub network_mode: String,
}

/// Host side of a published port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortBinding {
    #[serde(rename = "HostIp")]
    pub host_ip: String,
    #[serde(rename = "HostPort")]
    pub host_port: String,
}

impl ContainerSpec {
    /// Runtime payload for one descriptor; fields are passed through verbatim
    pub fn from_descriptor(descriptor: &ServiceDescriptor, ctx: &TopologyContext) -> Self {
        let exposed_ports = descriptor
            .ports
            .iter()
            .map(|p| (p.key(), EmptyObject::default()))
            .collect();

        let port_bindings = descriptor
            .ports
            .iter()
            .filter_map(|p| {
                p.host.as_ref().map(|host| {
                    (
                        p.key(),
                        vec![PortBinding {
                            host_ip: host.ip.clone(),
                            host_port: host.port.to_string(),
                        }],
                    )
                })
            })
            .collect();

        let mut labels = BTreeMap::new();
        labels.insert(PROJECT_LABEL.to_string(), PROJECT_NAME.to_string());
        labels.insert(SERVICE_LABEL.to_string(), descriptor.name.clone());

        Self {
            name: descriptor.name.clone(),
            image: descriptor.image.clone(),
            env: descriptor.env.to_pairs(),
            cmd: descriptor.command.clone(),
            exposed_ports,
            healthcheck: descriptor.health_check.as_ref().map(|probe| HealthConfig {
                test: vec!["CMD-SHELL".to_string(), probe.clone()],
            }),
            labels,
            host_config: HostConfig {
                binds: descriptor.volumes.iter().map(|m| m.to_bind()).collect(),
                port_bindings,
                network_mode: ctx.network.clone(),
            },
        }
    }
}
