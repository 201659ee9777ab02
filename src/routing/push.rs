//! Live routing update through the proxy's administrative API

use super::document::RoutingRules;
use crate::error::{DenError, Result};
use std::time::Duration;

/// Pushes routing rules to a running proxy's REST provider
pub struct RoutingPusher {
    endpoint: String,
    client: reqwest::Client,
}

impl RoutingPusher {
    /// Target the proxy listening for admin requests on `127.0.0.1:<api_port>`
    pub fn new(api_port: u16) -> Result<Self> {
        Self::with_endpoint(format!("http://127.0.0.1:{}/api/providers/rest", api_port), None)
    }

    /// Target the proxy and give up after `timeout`
    pub fn with_timeout(api_port: u16, timeout: Duration) -> Result<Self> {
        Self::with_endpoint(
            format!("http://127.0.0.1:{}/api/providers/rest", api_port),
            Some(timeout),
        )
    }

    /// Target an explicit REST provider URL
    pub fn with_endpoint(endpoint: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().no_proxy();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Replace the proxy's routing rules. Any status other than 200 means the
    /// proxy must be restarted; the update is not retried.
    pub async fn push(&self, rules: &RoutingRules) -> Result<()> {
        tracing::info!(
            "Pushing {} frontend(s) to {}",
            rules.frontends.len(),
            self.endpoint
        );

        let response = self
            .client
            .put(&self.endpoint)
            .json(rules)
            .send()
            .await
            .map_err(DenError::RoutingPush)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!("Proxy rejected routing update: {}", status);
            return Err(DenError::RoutingRejected {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RoutingDocument;
    use crate::service::default_factories;
    use crate::service::factories::testing::{linux_ctx, sample_config};
    use crate::test_support::scripted_server;

    fn rules() -> RoutingRules {
        let ctx = linux_ctx();
        let config = sample_config();
        let descriptors: Vec<_> = default_factories()
            .iter()
            .map(|f| f.build(&config, &ctx).unwrap())
            .collect();
        RoutingDocument::from_descriptors(&descriptors).unwrap().rules()
    }

    #[tokio::test]
    async fn test_push_success() {
        let (base_url, server) = scripted_server(vec![("200 OK", "")]).await;
        let pusher =
            RoutingPusher::with_endpoint(format!("{}/api/providers/rest", base_url), None).unwrap();

        pusher.push(&rules()).await.unwrap();

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("PUT /api/providers/rest"));
        assert!(requests[0].contains("\"frontends\""));
        assert!(requests[0].contains("den-router"));
    }

    #[tokio::test]
    async fn test_push_rejected_requires_restart() {
        let (base_url, server) = scripted_server(vec![("500 Internal Server Error", "")]).await;
        let pusher =
            RoutingPusher::with_endpoint(format!("{}/api/providers/rest", base_url), None).unwrap();

        let err = pusher.push(&rules()).await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, DenError::RoutingRejected { status: 500 }));
        assert!(err.requires_restart());
    }

    #[tokio::test]
    async fn test_push_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let pusher = RoutingPusher::with_endpoint(
            format!("http://{}/api/providers/rest", addr),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        let err = pusher.push(&rules()).await.unwrap_err();
        assert!(matches!(err, DenError::RoutingPush(_)));
        assert!(err.requires_restart());
    }

    #[test]
    fn test_default_endpoint() {
        let pusher = RoutingPusher::new(8080).unwrap();
        assert_eq!(pusher.endpoint(), "http://127.0.0.1:8080/api/providers/rest");
    }
}
