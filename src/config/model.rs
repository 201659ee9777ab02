//! Deployment configuration model
//!
//! Every optional setting is a `String` that defaults to empty. Factories test
//! presence with `is_empty()`, never with `Option`.

use super::platform::Platform;
use serde::{Deserialize, Serialize};

/// Complete deployment configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Core application server
    pub server: ServerConfig,
    /// Websocket relay
    pub router: RouterConfig,
    /// Reverse proxy
    pub proxy: ProxyConfig,
    /// Identity provider and key authority
    pub identity: IdentityConfig,
    /// Directory (LDAP) integration
    pub directory: DirectoryConfig,
    /// Database
    pub database: DatabaseConfig,
    /// Image references
    pub image: ImageConfig,
    /// Target platform
    pub platform: Platform,
}

/// Core application server settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Externally reachable URL, e.g. `https://den.example.com`
    pub external_url: String,
    /// API key
    pub api_key: String,
    /// Audit trails enabled
    pub audit_trails: bool,
    /// Login required
    pub login_required: bool,
    /// Server private key (base64 DER or PEM)
    pub private_key: String,
    /// Jet relay URL
    pub jet_server_url: String,
}

/// Websocket relay settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Router public key shared with the server (base64 DER or PEM)
    pub public_key: String,
}

/// Reverse proxy settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Public listening port
    pub listen_port: u16,
    /// Administrative API port
    pub api_port: u16,
    /// Web certificate (PEM)
    pub certificate: String,
    /// Web certificate private key (PEM)
    pub private_key: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_port: 4000,
            api_port: 8080,
            certificate: String::new(),
            private_key: String::new(),
        }
    }
}

impl ProxyConfig {
    /// Both halves of the web certificate are configured
    pub fn has_tls(&self) -> bool {
        !self.certificate.is_empty() && !self.private_key.is_empty()
    }
}

/// Identity provider and key authority settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Key authority realm
    pub realm: String,
    /// Key authority API key
    pub picky_api_key: String,
    /// Identity provider API key
    pub lucid_api_key: String,
    /// Identity provider admin username
    pub lucid_admin_username: String,
    /// Identity provider admin secret
    pub lucid_admin_secret: String,
}

/// Directory integration settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub server_url: String,
    pub username: String,
    pub password: String,
    pub user_group: String,
    pub server_type: String,
    pub base_dn: String,
}

/// Database settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://den-mongo:27017".to_string(),
        }
    }
}

/// Image references, one per service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub mongo: String,
    pub picky: String,
    pub lucid: String,
    pub router: String,
    pub server: String,
    pub traefik: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            mongo: "library/mongo:4.1-bionic".to_string(),
            picky: "devolutions/picky:4.2.1-buster".to_string(),
            lucid: "devolutions/den-lucid:3.3.3-buster".to_string(),
            router: "devolutions/den-router:0.5.0-buster".to_string(),
            server: "devolutions/den-server:1.1.0-buster".to_string(),
            traefik: "library/traefik:1.7".to_string(),
        }
    }
}
