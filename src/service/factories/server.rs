//! Core application server

use super::{curl_health, external_base, internal_url, names, ports, ServiceFactory};
use crate::config::DeploymentConfig;
use crate::error::Result;
use crate::service::context::TopologyContext;
use crate::service::descriptor::{Exposure, Mount, MountMode, Route, SecretFile, ServiceDescriptor};
use crate::service::env::{EnvList, EnvRule};
use crate::service::keys::{KeyConverter, KeyKind};
use std::sync::Arc;

/// Staged server private key
pub const PRIVATE_KEY_FILE: &str = "den-server.key";

/// Staged router public key
pub const PUBLIC_KEY_FILE: &str = "den-router.key";

/// Rewrite an `http(s)` URL to its websocket equivalent (`ws`/`wss`).
/// Exactly one scheme substitution is applied; other inputs are returned as-is.
pub fn websocket_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("https") {
        format!("wss{}", rest)
    } else if let Some(rest) = url.strip_prefix("http") {
        format!("ws{}", rest)
    } else {
        url.to_string()
    }
}

/// Both halves of the server/router key pair are configured
pub fn key_exchange_enabled(config: &DeploymentConfig) -> bool {
    !config.server.private_key.is_empty() && !config.router.public_key.is_empty()
}

fn key_path(ctx: &TopologyContext, file: &str) -> String {
    ctx.platform
        .join(&ctx.platform.mount_root(names::SERVER), file)
}

fn env_rules() -> Vec<EnvRule> {
    vec![
        EnvRule::always("PICKY_REALM", |c, _| c.identity.realm.clone()),
        EnvRule::always("PICKY_URL", |_, _| {
            internal_url("http", names::PICKY, ports::PICKY)
        }),
        EnvRule::always("PICKY_APIKEY", |c, _| c.identity.picky_api_key.clone()),
        EnvRule::always("AUDIT_TRAILS", |c, _| c.server.audit_trails.to_string()),
        EnvRule::always("LUCID_AUTHENTICATION_KEY", |c, _| {
            c.identity.lucid_api_key.clone()
        }),
        EnvRule::always("DEN_ROUTER_INTERNAL_URL", |_, _| {
            internal_url("ws", names::ROUTER, ports::ROUTER)
        }),
        EnvRule::always("DEN_ROUTER_EXTERNAL_URL", |c, _| {
            format!("{}/cow", websocket_url(external_base(c)))
        }),
        EnvRule::always("LUCID_INTERNAL_URL", |_, _| {
            internal_url("http", names::LUCID, ports::LUCID)
        }),
        EnvRule::always("LUCID_EXTERNAL_URL", |c, _| {
            format!("{}/lucid", external_base(c))
        }),
        EnvRule::always("DEN_LOGIN_REQUIRED", |c, _| c.server.login_required.to_string()),
        EnvRule::when(
            "DEN_PRIVATE_KEY_FILE",
            |c, _| key_exchange_enabled(c),
            |_, ctx| key_path(ctx, PRIVATE_KEY_FILE),
        ),
        EnvRule::when(
            "DEN_PUBLIC_KEY_FILE",
            |c, _| key_exchange_enabled(c),
            |_, ctx| key_path(ctx, PUBLIC_KEY_FILE),
        ),
        EnvRule::if_present("LDAP_USERNAME", |c, _| c.directory.username.clone()),
        EnvRule::if_present("LDAP_PASSWORD", |c, _| c.directory.password.clone()),
        EnvRule::if_present("LDAP_SERVER_URL", |c, _| c.directory.server_url.clone()),
        EnvRule::if_present("LDAP_USER_GROUP", |c, _| c.directory.user_group.clone()),
        EnvRule::if_present("JET_SERVER_URL", |c, _| c.server.jet_server_url.clone()),
        EnvRule::if_present("LDAP_BASE_DN", |c, _| c.directory.base_dn.clone()),
        EnvRule::if_present("LDAP_SERVER_TYPE", |c, _| c.directory.server_type.clone()),
        EnvRule::always("DEN_API_KEY", |c, _| c.server.api_key.clone()),
    ]
}

/// Builds the core application server
pub struct ServerFactory {
    converter: Arc<dyn KeyConverter>,
}

impl ServerFactory {
    pub fn new(converter: Arc<dyn KeyConverter>) -> Self {
        Self { converter }
    }

    /// Staged key files, or nothing when either key is missing
    fn key_files(&self, config: &DeploymentConfig) -> Result<Vec<SecretFile>> {
        if !key_exchange_enabled(config) {
            return Ok(Vec::new());
        }

        let private_key = self.converter.to_pem(
            "server.private_key",
            &config.server.private_key,
            KeyKind::PrivateKey,
        )?;
        let public_key = self.converter.to_pem(
            "router.public_key",
            &config.router.public_key,
            KeyKind::PublicKey,
        )?;

        Ok(vec![
            SecretFile::new(PRIVATE_KEY_FILE, private_key),
            SecretFile::new(PUBLIC_KEY_FILE, public_key),
        ])
    }
}

impl ServiceFactory for ServerFactory {
    fn name(&self) -> &'static str {
        names::SERVER
    }

    fn build(&self, config: &DeploymentConfig, ctx: &TopologyContext) -> Result<ServiceDescriptor> {
        let mut descriptor = ServiceDescriptor::new(names::SERVER, &config.image.server)
            .expose(ports::SERVER)
            .command([
                "--db_url",
                config.database.url.as_str(),
                "-m",
                "onprem",
                "-l",
                "trace",
            ])
            .health_check(&curl_health(names::SERVER, ports::SERVER));

        descriptor.env = EnvList::from_rules(&env_rules(), config, ctx);
        descriptor.secret_dir = Some(names::SERVER.to_string());
        descriptor.secrets = self.key_files(config)?;

        if !descriptor.secrets.is_empty() {
            descriptor = descriptor.mount(Mount::bind(
                &ctx.host_path(names::SERVER),
                &ctx.platform.mount_root(names::SERVER),
                MountMode::ReadOnly,
            ));
        } else if !config.server.private_key.is_empty() || !config.router.public_key.is_empty() {
            tracing::warn!("Only one half of the server/router key pair is configured; key exchange disabled");
        }

        descriptor.exposure = Some(Exposure {
            backend_url: internal_url("http", names::SERVER, ports::SERVER),
            routes: vec![Route::catch_all("server")],
        });

        Ok(descriptor)
    }
}
