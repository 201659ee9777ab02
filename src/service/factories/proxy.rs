//! Reverse proxy

use super::{names, ServiceFactory};
use crate::config::DeploymentConfig;
use crate::error::Result;
use crate::service::context::TopologyContext;
use crate::service::descriptor::{
    EntryPoint, Gateway, Mount, MountMode, SecretFile, ServiceDescriptor, TlsFiles,
};

/// Routing document file name inside the proxy's staging directory
pub const ROUTING_FILE: &str = "traefik.toml";

const CERT_FILE: &str = "traefik.cert";
const KEY_FILE: &str = "traefik.key";
const PUBLISH_IP: &str = "0.0.0.0";

/// Builds the reverse proxy
pub struct ProxyFactory;

impl ServiceFactory for ProxyFactory {
    fn name(&self) -> &'static str {
        names::TRAEFIK
    }

    fn build(&self, config: &DeploymentConfig, ctx: &TopologyContext) -> Result<ServiceDescriptor> {
        let proxy = &config.proxy;
        let root = ctx.platform.mount_root(names::TRAEFIK);
        let config_path = ctx.platform.join(&root, ROUTING_FILE);

        let mut descriptor = ServiceDescriptor::new(names::TRAEFIK, &config.image.traefik)
            .publish(proxy.listen_port, PUBLISH_IP, proxy.listen_port)
            .publish(proxy.api_port, PUBLISH_IP, proxy.api_port)
            .mount(Mount::bind(
                &ctx.host_path(names::TRAEFIK),
                &root,
                MountMode::ReadWrite,
            ))
            .command(["--file".to_string(), format!("--configFile={}", config_path)]);
        descriptor.secret_dir = Some(names::TRAEFIK.to_string());

        let (entrypoint, tls) = if proxy.has_tls() {
            descriptor.secrets = vec![
                SecretFile::new(CERT_FILE, proxy.certificate.clone()),
                SecretFile::new(KEY_FILE, proxy.private_key.clone()),
            ];
            let files = TlsFiles {
                cert_file: ctx.platform.join(&root, CERT_FILE),
                key_file: ctx.platform.join(&root, KEY_FILE),
            };
            (EntryPoint::Tls, Some(files))
        } else {
            if !proxy.certificate.is_empty() || !proxy.private_key.is_empty() {
                tracing::warn!("Web certificate is incomplete; serving plaintext only");
            }
            (EntryPoint::Plain, None)
        };

        descriptor.gateway = Some(Gateway {
            entrypoint,
            listen_port: proxy.listen_port,
            api_port: proxy.api_port,
            tls,
            config_file: ROUTING_FILE.to_string(),
        });

        Ok(descriptor)
    }
}
