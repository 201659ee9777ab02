//! Container runtime client

use super::config::ContainerSpec;
use crate::error::{DenError, Result};
use serde::Deserialize;
use std::future::Future;

/// Default Docker Engine endpoint
pub const DEFAULT_DOCKER_URL: &str = "http://127.0.0.1:2375";

/// Operations the applier needs from a container runtime
pub trait ContainerRuntime: Send + Sync {
    /// Create `name` if it does not exist yet
    fn ensure_network(&self, name: &str, driver: &str) -> impl Future<Output = Result<()>> + Send;

    /// Pull `image` (`name[:tag]`)
    fn pull_image(&self, image: &str) -> impl Future<Output = Result<()>> + Send;

    /// Create a container and return its id
    fn create_container(&self, spec: &ContainerSpec) -> impl Future<Output = Result<String>> + Send;

    /// Start a created container
    fn start_container(&self, id: &str) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateResponse {
    id: String,
}

/// Docker Engine REST client
pub struct DockerRuntime {
    base_url: String,
    client: reqwest::Client,
}

impl DockerRuntime {
    /// Client for the daemon listening on [`DEFAULT_DOCKER_URL`]
    pub fn new() -> Result<Self> {
        Self::with_url(DEFAULT_DOCKER_URL)
    }

    /// Client for an explicit daemon URL
    pub fn with_url(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().no_proxy().build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn rejected(operation: &str, response: reqwest::Response) -> DenError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        DenError::Runtime {
            operation: operation.to_string(),
            status,
            message: message.trim().to_string(),
        }
    }
}

/// Split `name[:tag]` the way the daemon expects; a colon before the last
/// `/` belongs to a registry host
fn split_image(image: &str) -> (&str, &str) {
    let name_start = image.rfind('/').map(|i| i + 1).unwrap_or(0);
    match image[name_start..].rfind(':') {
        Some(i) => (&image[..name_start + i], &image[name_start + i + 1..]),
        None => (image, "latest"),
    }
}

impl ContainerRuntime for DockerRuntime {
    async fn ensure_network(&self, name: &str, driver: &str) -> Result<()> {
        let body = serde_json::json!({
            "Name": name,
            "Driver": driver,
            "CheckDuplicate": true,
        });

        let response = self
            .client
            .post(format!("{}/networks/create", self.base_url))
            .json(&body)
            .send()
            .await?;

        match response.status().as_u16() {
            200 | 201 => {
                tracing::info!("Created network {}", name);
                Ok(())
            }
            409 => {
                tracing::debug!("Network {} already exists", name);
                Ok(())
            }
            _ => Err(Self::rejected("network create", response).await),
        }
    }

    async fn pull_image(&self, image: &str) -> Result<()> {
        let (name, tag) = split_image(image);
        tracing::info!("Pulling {}:{}", name, tag);

        let response = self
            .client
            .post(format!("{}/images/create", self.base_url))
            .query(&[("fromImage", name), ("tag", tag)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected("image pull", response).await);
        }

        // The daemon streams progress; the pull is done once the body ends.
        response.bytes().await?;
        Ok(())
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/containers/create", self.base_url))
            .query(&[("name", spec.name.as_str())])
            .json(spec)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected("container create", response).await);
        }

        let created: CreateResponse = response.json().await?;
        tracing::debug!("Created container {} ({})", spec.name, created.id);
        Ok(created.id)
    }

    async fn start_container(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/containers/{}/start", self.base_url, id))
            .send()
            .await?;

        match response.status().as_u16() {
            204 | 304 => Ok(()),
            _ => Err(Self::rejected("container start", response).await),
        }
    }
}
