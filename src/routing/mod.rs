//! Reverse-proxy routing
//!
//! Builds the proxy's frontend/backend table from the descriptor set and
//! pushes it to a running proxy.

pub mod document;
pub mod push;

pub use document::{RoutingDocument, RoutingRules};
pub use push::RoutingPusher;
