//! Websocket relay service

use super::{curl_health, internal_url, names, ports, ServiceFactory};
use crate::config::DeploymentConfig;
use crate::error::Result;
use crate::service::context::TopologyContext;
use crate::service::descriptor::{Exposure, Route, ServiceDescriptor};
use crate::service::env::{EnvList, EnvRule};

/// Public path prefix of the relay
pub const PATH_PREFIX: &str = "/cow";

fn env_rules() -> Vec<EnvRule> {
    vec![EnvRule::always("DEN_SERVER_URL", |_, _| {
        internal_url("http", names::SERVER, ports::SERVER)
    })]
}

/// Builds the websocket relay
pub struct RouterFactory;

impl ServiceFactory for RouterFactory {
    fn name(&self) -> &'static str {
        names::ROUTER
    }

    fn build(&self, config: &DeploymentConfig, ctx: &TopologyContext) -> Result<ServiceDescriptor> {
        let mut descriptor = ServiceDescriptor::new(names::ROUTER, &config.image.router)
            .expose(ports::ROUTER)
            .health_check(&curl_health(names::ROUTER, ports::ROUTER));
        descriptor.env = EnvList::from_rules(&env_rules(), config, ctx);
        descriptor.exposure = Some(Exposure {
            backend_url: internal_url("http", names::ROUTER, ports::ROUTER),
            routes: vec![Route::strip_prefix("router", PATH_PREFIX)],
        });
        Ok(descriptor)
    }
}
