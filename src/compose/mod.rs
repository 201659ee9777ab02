//! Topology composition and Docker Compose rendering
//!
//! The composer turns a deployment configuration into a [`Topology`]; the
//! manifest module renders a topology as a compose file plus routing document.

pub mod config;
pub mod manifest;
pub mod topology;

pub use config::{ComposeConfig, ServiceConfig};
pub use manifest::{export, export_deployment, render, ExportKind, Manifest};
pub use topology::{Composer, Topology};
