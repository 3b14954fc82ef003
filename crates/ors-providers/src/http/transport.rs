//! HTTP Upstream Transport
//!
//! Issues `GET {base_url}/{resource_path}/{id}` and classifies the answer:
//!
//! | Status | Outcome |
//! |--------|---------|
//! | 2xx | [`UpstreamResponse::Found`] with the raw body |
//! | 404 | [`UpstreamResponse::NotFound`] |
//! | 400 | [`UpstreamResponse::BadRequest`] with the body as reason |
//! | anything else, or no response | [`UpstreamResponse::Unavailable`] |
//!
//! Bodies of failure responses other than 400 are never interpreted.

use crate::constants::{
    HTTP_HEADER_AUTHORIZATION, HTTP_POOL_IDLE_TIMEOUT_SECS, HTTP_POOL_MAX_IDLE_PER_HOST,
    HTTP_REQUEST_TIMEOUT_SECS,
};
use async_trait::async_trait;
use ors_domain::error::{Error, Result};
use ors_domain::ports::{UpstreamResponse, UpstreamTransport};
use ors_domain::value_objects::{EntityKind, RequestContext};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// HTTP client configuration
///
/// Controls connection pooling and the transport-level timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Maximum idle connections per host
    pub max_idle_per_host: usize,
    /// Idle connection timeout
    pub idle_timeout: Duration,
    /// Total timeout for requests
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: HTTP_POOL_MAX_IDLE_PER_HOST,
            idle_timeout: Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS),
            timeout: Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS),
            user_agent: format!("ors/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create configuration with custom timeout only
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }

    /// Build a reqwest client from this configuration
    pub fn build_client(&self) -> Result<Client> {
        Client::builder()
            .pool_max_idle_per_host(self.max_idle_per_host)
            .pool_idle_timeout(self.idle_timeout)
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| {
                Error::infrastructure_with_source(format!("Failed to build HTTP client: {e}"), e)
            })
    }
}

/// Upstream transport over HTTP
#[derive(Clone)]
pub struct HttpUpstreamTransport {
    client: Client,
    name: String,
    base_url: String,
    resource_path: String,
}

impl HttpUpstreamTransport {
    /// Create a transport for one upstream
    ///
    /// # Arguments
    ///
    /// * `name` - Upstream name used in logs and errors (e.g. "products")
    /// * `base_url` - Scheme, host and port of the upstream
    /// * `resource_path` - Path segment before the id (e.g. "api/products")
    /// * `config` - HTTP client configuration
    pub fn new(
        name: impl Into<String>,
        base_url: &str,
        resource_path: &str,
        config: &HttpClientConfig,
    ) -> Result<Self> {
        Ok(Self::with_client(
            config.build_client()?,
            name,
            base_url,
            resource_path,
        ))
    }

    /// Create a transport sharing an existing client
    pub fn with_client(
        client: Client,
        name: impl Into<String>,
        base_url: &str,
        resource_path: &str,
    ) -> Self {
        Self {
            client,
            name: name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            resource_path: resource_path.trim_matches('/').to_string(),
        }
    }

    /// URL of the entity with the given id
    pub fn entity_url(&self, id: Uuid) -> String {
        if self.resource_path.is_empty() {
            format!("{}/{id}", self.base_url)
        } else {
            format!("{}/{}/{id}", self.base_url, self.resource_path)
        }
    }

    async fn classify(&self, response: reqwest::Response) -> UpstreamResponse {
        let status = response.status();
        match status {
            s if s.is_success() => match response.text().await {
                Ok(body) => UpstreamResponse::Found(body),
                Err(e) => UpstreamResponse::Unavailable(format!("failed to read body: {e}")),
            },
            StatusCode::NOT_FOUND => UpstreamResponse::NotFound,
            StatusCode::BAD_REQUEST => {
                let reason = response
                    .text()
                    .await
                    .ok()
                    .filter(|body| !body.trim().is_empty())
                    .unwrap_or_else(|| "Bad Request".to_string());
                UpstreamResponse::BadRequest(reason)
            }
            other => UpstreamResponse::Unavailable(format!("{} returned {other}", self.name)),
        }
    }
}

#[async_trait]
impl UpstreamTransport for HttpUpstreamTransport {
    async fn fetch(&self, kind: EntityKind, id: Uuid, ctx: &RequestContext) -> UpstreamResponse {
        let url = self.entity_url(id);
        debug!(upstream = %self.name, %kind, %url, "Fetching entity");

        let mut request = self.client.get(&url);
        if let Some(authorization) = &ctx.authorization {
            request = request.header(HTTP_HEADER_AUTHORIZATION, authorization);
        }

        match request.send().await {
            Ok(response) => self.classify(response).await,
            Err(e) => UpstreamResponse::Unavailable(format!("{} request failed: {e}", self.name)),
        }
    }

    fn upstream_name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for HttpUpstreamTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpUpstreamTransport")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("resource_path", &self.resource_path)
            .finish_non_exhaustive()
    }
}
