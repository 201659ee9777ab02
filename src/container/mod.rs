//! Live deployment against a container runtime
//!
//! Descriptors are translated into Docker Engine create payloads and applied
//! one service at a time.

pub mod config;
pub mod lifecycle;
pub mod runtime;

pub use config::{ContainerSpec, HostConfig, PortBinding};
pub use lifecycle::{RuntimeApplier, ServiceHandle};
pub use runtime::{ContainerRuntime, DockerRuntime, DEFAULT_DOCKER_URL};
