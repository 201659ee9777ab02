//! Deployment configuration
//!
//! The typed configuration model, the target platform, and the on-disk store.

pub mod model;
pub mod platform;
pub mod store;

pub use model::{
    DatabaseConfig, DeploymentConfig, DirectoryConfig, IdentityConfig, ImageConfig, ProxyConfig,
    RouterConfig, ServerConfig,
};
pub use platform::Platform;
pub use store::ConfigStore;
