//! Service factories
//!
//! One factory per logical service. A factory is a pure function of the
//! configuration and the topology context: files it needs on disk are
//! declared in the descriptor's `secrets`, never written here.

mod lucid;
mod mongo;
mod picky;
mod proxy;
mod router;
mod server;

pub use lucid::LucidFactory;
pub use mongo::MongoFactory;
pub use picky::PickyFactory;
pub use proxy::{ProxyFactory, ROUTING_FILE};
pub use router::RouterFactory;
pub use server::{websocket_url, ServerFactory};

use super::context::TopologyContext;
use super::descriptor::ServiceDescriptor;
use super::keys::PemConverter;
use crate::config::DeploymentConfig;
use crate::error::Result;
use std::sync::Arc;

/// Logical service names; also the host names on the service network
pub mod names {
    pub const MONGO: &str = "den-mongo";
    pub const PICKY: &str = "den-picky";
    pub const LUCID: &str = "den-lucid";
    pub const ROUTER: &str = "den-router";
    pub const SERVER: &str = "den-server";
    pub const TRAEFIK: &str = "traefik";
}

/// Service ports on the service network
pub mod ports {
    pub const MONGO: u16 = 27017;
    pub const PICKY: u16 = 12345;
    pub const LUCID: u16 = 4242;
    pub const ROUTER: u16 = 4491;
    pub const SERVER: u16 = 10255;
}

/// `<scheme>://<service>:<port>` on the service network
pub fn internal_url(scheme: &str, service: &str, port: u16) -> String {
    format!("{}://{}:{}", scheme, service, port)
}

/// `curl` health probe against a service's `/health` endpoint
pub(crate) fn curl_health(service: &str, port: u16) -> String {
    format!("curl -sS {}/health", internal_url("http", service, port))
}

/// Configured external URL without a trailing slash
pub(crate) fn external_base(config: &DeploymentConfig) -> &str {
    config.server.external_url.trim_end_matches('/')
}

/// Builds the descriptor of one logical service
pub trait ServiceFactory: Send + Sync {
    /// Logical name of the service this factory builds
    fn name(&self) -> &'static str;

    /// Derive the service descriptor
    fn build(&self, config: &DeploymentConfig, ctx: &TopologyContext)
        -> Result<ServiceDescriptor>;
}

/// Every service of the deployment, in start order
pub fn default_factories() -> Vec<Box<dyn ServiceFactory>> {
    let converter = Arc::new(PemConverter);
    vec![
        Box::new(MongoFactory),
        Box::new(PickyFactory),
        Box::new(LucidFactory),
        Box::new(RouterFactory),
        Box::new(ServerFactory::new(converter)),
        Box::new(ProxyFactory),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::config::{DeploymentConfig, Platform};
    use crate::service::context::TopologyContext;
    use std::path::PathBuf;

    /// Configuration with every required setting filled in
    pub fn sample_config() -> DeploymentConfig {
        let mut config = DeploymentConfig::default();
        config.server.external_url = "https://den.example.com".to_string();
        config.server.api_key = "server-api-key".to_string();
        config.server.login_required = true;
        config.identity.realm = "den.example.com".to_string();
        config.identity.picky_api_key = "picky-api-key".to_string();
        config.identity.lucid_api_key = "lucid-api-key".to_string();
        config.identity.lucid_admin_username = "lucid-admin".to_string();
        config.identity.lucid_admin_secret = "lucid-secret".to_string();
        config
    }

    pub fn linux_ctx() -> TopologyContext {
        TopologyContext::new(PathBuf::from("/srv/den"), Platform::Linux)
    }

    pub fn windows_ctx() -> TopologyContext {
        TopologyContext::new(PathBuf::from("/srv/den"), Platform::Windows)
    }
}
