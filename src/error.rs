//! Error types for Den deployments

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Den operations
pub type Result<T> = std::result::Result<T, DenError>;

/// Den error types
#[derive(Error, Debug)]
pub enum DenError {
    #[error("Failed to stage secret material at {}", path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid key material in {setting}: {message}")]
    KeyFormat { setting: String, message: String },

    #[error("Duplicate service name in topology: {0}")]
    DuplicateService(String),

    #[error("Failed to apply service {service} ({} service(s) already created)", applied.len())]
    Apply {
        service: String,
        /// Container ids created before the failure; they are left running.
        applied: Vec<String>,
        #[source]
        source: Box<DenError>,
    },

    #[error("Container runtime rejected {operation} with status {status}: {message}")]
    Runtime {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("Proxy rejected the routing update with status {status}; restart the deployment to reload routing")]
    RoutingRejected { status: u16 },

    #[error("Could not reach the proxy admin endpoint; restart the deployment to reload routing")]
    RoutingPush(#[source] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl DenError {
    /// Wrap an I/O failure with the path it happened on
    pub fn staging(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DenError::Staging {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure requires restarting the deployment to recover
    pub fn requires_restart(&self) -> bool {
        matches!(
            self,
            DenError::RoutingRejected { .. } | DenError::RoutingPush(_)
        )
    }
}
