//! Reverse-proxy routing document
//!
//! The static document is written as TOML next to the compose file and into
//! the proxy's staging directory. Its `frontends`/`backends` half is also the
//! JSON body pushed to a running proxy.

use crate::error::{DenError, Result};
use crate::service::{EntryPoint, ServiceDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entrypoint serving the administrative API and the REST provider
pub const API_ENTRYPOINT: &str = "api";

/// Complete static routing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDocument {
    pub default_entry_points: Vec<String>,
    pub entry_points: BTreeMap<String, EntryPointDef>,
    pub api: ProviderEntry,
    pub rest: ProviderEntry,
    pub file: FileProvider,
    pub frontends: BTreeMap<String, Frontend>,
    pub backends: BTreeMap<String, Backend>,
}

/// Frontends and backends only; the body of a live routing update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingRules {
    pub frontends: BTreeMap<String, Frontend>,
    pub backends: BTreeMap<String, Backend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPointDef {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TlsDef {
    pub certificates: Vec<Certificate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub cert_file: String,
    pub key_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderEntry {
    pub entry_point: String,
}

/// Enables the file provider on the document itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileProvider {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontend {
    pub backend: String,
    pub pass_host_header: bool,
    pub entry_points: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub routes: BTreeMap<String, RouteDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDef {
    pub rule: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backend {
    pub servers: BTreeMap<String, Server>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
}

impl RoutingDocument {
    /// Build the routing document from a descriptor set.
    ///
    /// Exactly one descriptor must carry a gateway; every descriptor with an
    /// exposure gets one backend keyed by its logical name and one frontend per
    /// route.
    pub fn from_descriptors(descriptors: &[ServiceDescriptor]) -> Result<Self> {
        let mut gateways = descriptors.iter().filter_map(|d| d.gateway.as_ref());
        let gateway = gateways
            .next()
            .ok_or_else(|| DenError::Config("Topology has no reverse proxy".to_string()))?;
        if gateways.next().is_some() {
            return Err(DenError::Config(
                "Topology has more than one reverse proxy".to_string(),
            ));
        }

        let entrypoint = gateway.entrypoint.id().to_string();

        let mut entry_points = BTreeMap::new();
        entry_points.insert(
            entrypoint.clone(),
            EntryPointDef {
                address: format!(":{}", gateway.listen_port),
                tls: match (gateway.entrypoint, &gateway.tls) {
                    (EntryPoint::Tls, Some(files)) => Some(TlsDef {
                        certificates: vec![Certificate {
                            cert_file: files.cert_file.clone(),
                            key_file: files.key_file.clone(),
                        }],
                    }),
                    _ => None,
                },
            },
        );
        entry_points.insert(
            API_ENTRYPOINT.to_string(),
            EntryPointDef {
                address: format!(":{}", gateway.api_port),
                tls: None,
            },
        );

        let mut frontends = BTreeMap::new();
        let mut backends = BTreeMap::new();
        for descriptor in descriptors {
            let Some(exposure) = &descriptor.exposure else {
                continue;
            };

            let mut servers = BTreeMap::new();
            servers.insert(
                descriptor.name.clone(),
                Server {
                    url: exposure.backend_url.clone(),
                },
            );
            backends.insert(descriptor.name.clone(), Backend { servers });

            for route in &exposure.routes {
                let mut routes = BTreeMap::new();
                if let Some(rule) = &route.rule {
                    routes.insert(route.name.clone(), RouteDef { rule: rule.clone() });
                }

                let frontend = Frontend {
                    backend: descriptor.name.clone(),
                    pass_host_header: true,
                    entry_points: vec![entrypoint.clone()],
                    routes,
                };
                if frontends.insert(route.name.clone(), frontend).is_some() {
                    return Err(DenError::Config(format!(
                        "Duplicate frontend route: {}",
                        route.name
                    )));
                }
            }
        }

        Ok(Self {
            default_entry_points: vec![entrypoint],
            entry_points,
            api: ProviderEntry {
                entry_point: API_ENTRYPOINT.to_string(),
            },
            rest: ProviderEntry {
                entry_point: API_ENTRYPOINT.to_string(),
            },
            file: FileProvider::default(),
            frontends,
            backends,
        })
    }

    /// The single entrypoint every frontend is bound to
    pub fn active_entrypoint(&self) -> Option<&str> {
        self.default_entry_points.first().map(String::as_str)
    }

    /// Frontends and backends for a live update
    pub fn rules(&self) -> RoutingRules {
        RoutingRules {
            frontends: self.frontends.clone(),
            backends: self.backends.clone(),
        }
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

impl RoutingRules {
    /// Render as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
