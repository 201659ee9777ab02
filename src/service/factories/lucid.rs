//! Identity provider service

use super::{curl_health, external_base, internal_url, names, ports, ServiceFactory};
use crate::config::DeploymentConfig;
use crate::error::Result;
use crate::service::context::TopologyContext;
use crate::service::descriptor::{Exposure, Route, ServiceDescriptor};
use crate::service::env::{EnvList, EnvRule};

/// Public path prefix of the identity provider
pub const PATH_PREFIX: &str = "/lucid";

fn env_rules() -> Vec<EnvRule> {
    vec![
        EnvRule::always("LUCID_ADMIN__USERNAME", |c, _| {
            c.identity.lucid_admin_username.clone()
        }),
        EnvRule::always("LUCID_ADMIN__SECRET", |c, _| {
            c.identity.lucid_admin_secret.clone()
        }),
        EnvRule::always("LUCID_API__KEY", |c, _| c.identity.lucid_api_key.clone()),
        EnvRule::always("LUCID_DATABASE__URL", |c, _| c.database.url.clone()),
        EnvRule::always("LUCID_TOKEN__ISSUER", |c, _| {
            format!("{}{}", external_base(c), PATH_PREFIX)
        }),
        EnvRule::always("LUCID_ACCOUNT__APIKEY", |c, _| c.server.api_key.clone()),
        EnvRule::always("LUCID_ACCOUNT__SERVER_URL", |_, _| {
            internal_url("http", names::SERVER, ports::SERVER)
        }),
    ]
}

/// Builds the identity provider
pub struct LucidFactory;

impl ServiceFactory for LucidFactory {
    fn name(&self) -> &'static str {
        names::LUCID
    }

    fn build(&self, config: &DeploymentConfig, ctx: &TopologyContext) -> Result<ServiceDescriptor> {
        let mut descriptor = ServiceDescriptor::new(names::LUCID, &config.image.lucid)
            .expose(ports::LUCID)
            .health_check(&curl_health(names::LUCID, ports::LUCID));
        descriptor.env = EnvList::from_rules(&env_rules(), config, ctx);
        descriptor.exposure = Some(Exposure {
            backend_url: internal_url("http", names::LUCID, ports::LUCID),
            routes: vec![
                Route::strip_prefix("lucid", PATH_PREFIX),
                Route::prefix("lucidop", "/op"),
                Route::prefix("lucidauth", "/auth"),
            ],
        });
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn test_lucid_token_issuer() {
        let mut config = sample_config();
        config.server.external_url = "https://den.example.com/".to_string();
        let descriptor = LucidFactory.build(&config, &linux_ctx()).unwrap();
        assert_eq!(
            descriptor.env.get("LUCID_TOKEN__ISSUER"),
            Some("https://den.example.com/lucid")
        );
        assert_eq!(descriptor.env.get("LUCID_ACCOUNT__APIKEY"), Some("server-api-key"));
    }

    #[test]
    fn test_lucid_routes() {
        let descriptor = LucidFactory.build(&sample_config(), &linux_ctx()).unwrap();
        let exposure = descriptor.exposure.unwrap();
        assert_eq!(exposure.backend_url, "http://den-lucid:4242");
        let names: Vec<&str> = exposure.routes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["lucid", "lucidop", "lucidauth"]);
    }
}
