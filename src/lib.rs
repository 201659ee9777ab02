//! Den deployment engine
//!
//! Derives the Den multi-container deployment from a single configuration
//! document and either exports it as static manifests or applies it live:
//!
//! - Service descriptors for every Den service
//! - Docker Compose and Traefik routing manifests
//! - Live container apply over the Docker Engine API
//! - Live routing updates through the proxy's admin endpoint

pub mod compose;
pub mod config;
pub mod container;
pub mod error;
pub mod routing;
pub mod service;

#[cfg(test)]
mod test_support;

pub use error::{DenError, Result};
