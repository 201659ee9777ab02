//! Service descriptor: the complete startup contract of one container
//!
//! Both the manifest serializer and the runtime applier read descriptors and
//! nothing else.

use super::env::EnvList;
use serde::{Deserialize, Serialize};

/// One logical service of the deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Logical name, unique within a topology; also the in-network host name
    pub name: String,
    /// Image reference (`name:tag`)
    pub image: String,
    /// Environment variables
    pub env: EnvList,
    /// Container ports and their optional host bindings
    pub ports: Vec<PortSpec>,
    /// Volume mounts
    pub volumes: Vec<Mount>,
    /// Entrypoint arguments, in order
    pub command: Vec<String>,
    /// Health check command
    pub health_check: Option<String>,
    /// Staging directory under the deployment root owned by this service.
    /// It is recreated on every composition.
    pub secret_dir: Option<String>,
    /// Files written into `secret_dir` before the service starts
    pub secrets: Vec<SecretFile>,
    /// Present when the service accepts external traffic through the proxy
    pub exposure: Option<Exposure>,
    /// Present on the reverse proxy only
    pub gateway: Option<Gateway>,
}

impl ServiceDescriptor {
    /// Create an empty descriptor for `name` running `image`
    pub fn new(name: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            env: EnvList::new(),
            ports: Vec::new(),
            volumes: Vec::new(),
            command: Vec::new(),
            health_check: None,
            secret_dir: None,
            secrets: Vec::new(),
            exposure: None,
            gateway: None,
        }
    }

    /// Set entrypoint arguments
    pub fn command<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the health check command
    pub fn health_check(mut self, probe: &str) -> Self {
        self.health_check = Some(probe.to_string());
        self
    }

    /// Expose a container port on the service network only
    pub fn expose(mut self, container_port: u16) -> Self {
        self.ports.push(PortSpec {
            container_port,
            host: None,
        });
        self
    }

    /// Publish a container port on the host
    pub fn publish(mut self, container_port: u16, host_ip: &str, host_port: u16) -> Self {
        self.ports.push(PortSpec {
            container_port,
            host: Some(HostBinding {
                ip: host_ip.to_string(),
                port: host_port,
            }),
        });
        self
    }

    /// Add a volume mount
    pub fn mount(mut self, mount: Mount) -> Self {
        self.volumes.push(mount);
        self
    }

    /// Named volumes referenced by this service
    pub fn named_volumes(&self) -> impl Iterator<Item = &str> {
        self.volumes
            .iter()
            .filter(|m| m.kind == MountKind::Volume)
            .map(|m| m.source.as_str())
    }
}

/// Container port with optional host binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    pub container_port: u16,
    pub host: Option<HostBinding>,
}

/// Host side of a published port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostBinding {
    pub ip: String,
    pub port: u16,
}

impl PortSpec {
    /// Port key in Docker notation, e.g. `4000/tcp`
    pub fn key(&self) -> String {
        format!("{}/tcp", self.container_port)
    }

    /// Compose short syntax, e.g. `0.0.0.0:4000:4000`
    pub fn to_compose(&self) -> String {
        match &self.host {
            Some(host) => format!("{}:{}:{}", host.ip, host.port, self.container_port),
            None => self.container_port.to_string(),
        }
    }
}

/// Mount source kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountKind {
    /// Host directory
    Bind,
    /// Runtime-managed named volume
    Volume,
}

/// Mount access mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountMode {
    ReadOnly,
    ReadWrite,
}

/// Volume mount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    pub kind: MountKind,
    /// Host path or volume name
    pub source: String,
    /// Path inside the container
    pub target: String,
    pub mode: MountMode,
}

impl Mount {
    /// Bind-mount a host directory
    pub fn bind(source: &str, target: &str, mode: MountMode) -> Self {
        Self {
            kind: MountKind::Bind,
            source: source.to_string(),
            target: target.to_string(),
            mode,
        }
    }

    /// Mount a named volume read-write
    pub fn volume(name: &str, target: &str) -> Self {
        Self {
            kind: MountKind::Volume,
            source: name.to_string(),
            target: target.to_string(),
            mode: MountMode::ReadWrite,
        }
    }

    /// `source:target[:ro]` notation shared by compose files and Docker binds
    pub fn to_bind(&self) -> String {
        match self.mode {
            MountMode::ReadOnly => format!("{}:{}:ro", self.source, self.target),
            MountMode::ReadWrite => format!("{}:{}", self.source, self.target),
        }
    }
}

/// File staged into a service's secret directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretFile {
    pub file_name: String,
    pub contents: String,
}

impl SecretFile {
    pub fn new(file_name: &str, contents: String) -> Self {
        Self {
            file_name: file_name.to_string(),
            contents,
        }
    }
}

/// How the proxy reaches a service from outside
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exposure {
    /// Base URL on the service network
    pub backend_url: String,
    /// Frontend routes pointing at this service
    pub routes: Vec<Route>,
}

/// Frontend route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Frontend name
    pub name: String,
    /// Matching rule; `None` matches everything not claimed by another rule
    pub rule: Option<String>,
}

impl Route {
    /// Match a path prefix and strip it before forwarding
    pub fn strip_prefix(name: &str, prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            rule: Some(format!("PathPrefixStripRegex:{}", prefix)),
        }
    }

    /// Match a path prefix and forward it unchanged
    pub fn prefix(name: &str, prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            rule: Some(format!("PathPrefix:{}", prefix)),
        }
    }

    /// Catch-all route
    pub fn catch_all(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rule: None,
        }
    }
}

/// Proxy entrypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    /// Plaintext HTTP and websocket traffic
    Plain,
    /// TLS-terminated traffic
    Tls,
}

impl EntryPoint {
    /// Identifier used in the routing document
    pub fn id(&self) -> &'static str {
        match self {
            EntryPoint::Plain => "ws",
            EntryPoint::Tls => "https",
        }
    }
}

impl std::fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Reverse-proxy settings carried by the proxy's descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    /// The single active entrypoint
    pub entrypoint: EntryPoint,
    /// Public listening port
    pub listen_port: u16,
    /// Administrative API port
    pub api_port: u16,
    /// In-container paths of the staged certificate, when TLS is active
    pub tls: Option<TlsFiles>,
    /// File name of the routing document inside the proxy's secret directory
    pub config_file: String,
}

/// In-container certificate paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsFiles {
    pub cert_file: String,
    pub key_file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_notation() {
        let descriptor = ServiceDescriptor::new("traefik", "traefik:1.7")
            .publish(4000, "0.0.0.0", 4000)
            .expose(8081);

        assert_eq!(descriptor.ports[0].to_compose(), "0.0.0.0:4000:4000");
        assert_eq!(descriptor.ports[0].key(), "4000/tcp");
        assert_eq!(descriptor.ports[1].to_compose(), "8081");
    }

    #[test]
    fn test_mount_notation() {
        let ro = Mount::bind("/srv/den/den-server", "/etc/den-server", MountMode::ReadOnly);
        assert_eq!(ro.to_bind(), "/srv/den/den-server:/etc/den-server:ro");

        let rw = Mount::volume("den-mongodata", "/data/db");
        assert_eq!(rw.to_bind(), "den-mongodata:/data/db");
    }

    #[test]
    fn test_named_volumes() {
        let descriptor = ServiceDescriptor::new("den-mongo", "mongo")
            .mount(Mount::volume("den-mongodata", "/data/db"))
            .mount(Mount::bind("/tmp", "/tmp", MountMode::ReadWrite));

        let volumes: Vec<&str> = descriptor.named_volumes().collect();
        assert_eq!(volumes, vec!["den-mongodata"]);
    }

    #[test]
    fn test_route_rules() {
        assert_eq!(
            Route::strip_prefix("router", "/cow").rule.as_deref(),
            Some("PathPrefixStripRegex:/cow")
        );
        assert_eq!(Route::prefix("op", "/op").rule.as_deref(), Some("PathPrefix:/op"));
        assert!(Route::catch_all("server").rule.is_none());
    }
}
