//! Key authority service

use super::{curl_health, names, ports, ServiceFactory};
use crate::config::DeploymentConfig;
use crate::error::Result;
use crate::service::context::TopologyContext;
use crate::service::descriptor::ServiceDescriptor;
use crate::service::env::{EnvList, EnvRule};

fn env_rules() -> Vec<EnvRule> {
    vec![
        EnvRule::always("PICKY_REALM", |c, _| c.identity.realm.clone()),
        EnvRule::always("PICKY_API_KEY", |c, _| c.identity.picky_api_key.clone()),
        EnvRule::always("PICKY_DATABASE_URL", |c, _| c.database.url.clone()),
        EnvRule::always("PICKY_BACKEND", |_, _| "mongodb".to_string()),
    ]
}

/// Builds the key authority
pub struct PickyFactory;

impl ServiceFactory for PickyFactory {
    fn name(&self) -> &'static str {
        names::PICKY
    }

    fn build(&self, config: &DeploymentConfig, ctx: &TopologyContext) -> Result<ServiceDescriptor> {
        let mut descriptor = ServiceDescriptor::new(names::PICKY, &config.image.picky)
            .expose(ports::PICKY)
            .health_check(&curl_health(names::PICKY, ports::PICKY));
        descriptor.env = EnvList::from_rules(&env_rules(), config, ctx);
        Ok(descriptor)
    }
}
