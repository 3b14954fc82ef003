//! Service container bootstrap
//!
//! Composition root: turns an [`AppConfig`] into the shared cache store, one
//! HTTP transport and one policy engine per upstream, the two typed lookup
//! clients and the order enrichment service. Invalidation consumers are
//! started separately because they need a running event bus.
//!
//! ```text
//! AppConfig → cache store ──────────────┬──────────────┐
//!           → transport + engine (users) → lookup client → enrichment
//!           → transport + engine (products) → lookup client ┘
//!           → event bus sources → invalidation consumers → cache store
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let container = ServiceContainer::build(&config)?;
//! let consumers = container.spawn_invalidation_consumers(CancellationToken::new()).await?;
//!
//! let product = container.products().fetch_by_id(id, &RequestContext::new()).await?;
//!
//! consumers.shutdown().await;
//! ```

use crate::cache::create_cache_provider;
use crate::config::{AppConfig, EventBusConfig, EventBusProvider, UpstreamConfig};
use ors_application::domain_services::EntityLookup;
use ors_application::resilience::PolicyEngine;
use ors_application::use_cases::{
    ConsumerReport, InvalidationConsumer, OrderEnrichmentService, RemoteLookupClient,
};
use ors_domain::entities::{ProductDto, RemoteEntity, UserDto};
use ors_domain::error::Result;
use ors_domain::ports::{CacheProvider, InvalidationSource, UpstreamTransport};
use ors_providers::events::NullInvalidationSource;
use ors_providers::http::{HttpClientConfig, HttpUpstreamTransport};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Application services built from the configuration
pub struct ServiceContainer {
    config: Arc<AppConfig>,
    cache: Arc<dyn CacheProvider>,
    users: Arc<RemoteLookupClient<UserDto>>,
    products: Arc<RemoteLookupClient<ProductDto>>,
    enrichment: Arc<OrderEnrichmentService>,
}

impl ServiceContainer {
    /// Build every service with the configured cache store
    pub fn build(config: &AppConfig) -> Result<Self> {
        let cache = create_cache_provider(&config.cache)?;
        Self::with_cache(config, cache)
    }

    /// Build every service around an existing cache store
    pub fn with_cache(config: &AppConfig, cache: Arc<dyn CacheProvider>) -> Result<Self> {
        let client = HttpClientConfig::default().build_client()?;

        let users_transport: Arc<dyn UpstreamTransport> =
            Arc::new(HttpUpstreamTransport::with_client(
                client.clone(),
                "users",
                &config.upstreams.users.base_url,
                &config.upstreams.users.resource_path,
            ));
        let products_transport: Arc<dyn UpstreamTransport> =
            Arc::new(HttpUpstreamTransport::with_client(
                client,
                "products",
                &config.upstreams.products.base_url,
                &config.upstreams.products.resource_path,
            ));

        Ok(Self::from_transports(
            config,
            cache,
            users_transport,
            products_transport,
        ))
    }

    /// Build every service around existing transports and cache store
    pub fn from_transports(
        config: &AppConfig,
        cache: Arc<dyn CacheProvider>,
        users_transport: Arc<dyn UpstreamTransport>,
        products_transport: Arc<dyn UpstreamTransport>,
    ) -> Self {
        let users = Arc::new(lookup_client::<UserDto>(
            users_transport,
            cache.clone(),
            &config.upstreams.users,
        ));
        let products = Arc::new(lookup_client::<ProductDto>(
            products_transport,
            cache.clone(),
            &config.upstreams.products,
        ));
        let enrichment = Arc::new(OrderEnrichmentService::new(
            users.clone() as Arc<dyn EntityLookup<UserDto>>,
            products.clone() as Arc<dyn EntityLookup<ProductDto>>,
        ));

        info!(
            cache = cache.provider_name(),
            users = %config.upstreams.users.base_url,
            products = %config.upstreams.products.base_url,
            "Service container built"
        );

        Self {
            config: Arc::new(config.clone()),
            cache,
            users,
            products,
            enrichment,
        }
    }

    /// Configuration the container was built from
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared cache store
    pub fn cache(&self) -> Arc<dyn CacheProvider> {
        self.cache.clone()
    }

    /// Lookup client of the users directory
    pub fn users(&self) -> Arc<RemoteLookupClient<UserDto>> {
        self.users.clone()
    }

    /// Lookup client of the product catalog
    pub fn products(&self) -> Arc<RemoteLookupClient<ProductDto>> {
        self.products.clone()
    }

    /// Order enrichment over both lookup clients
    pub fn enrichment(&self) -> Arc<OrderEnrichmentService> {
        self.enrichment.clone()
    }

    /// Start one consumer per upstream with invalidation enabled
    ///
    /// Sources come from the configured event bus. Cancelling `shutdown`
    /// (or calling [`ConsumerHandles::shutdown`]) stops every consumer.
    pub async fn spawn_invalidation_consumers(
        &self,
        shutdown: CancellationToken,
    ) -> Result<ConsumerHandles> {
        let event_bus = self.config.event_bus.clone();
        self.spawn_invalidation_consumers_with(shutdown, |stream| {
            let event_bus = event_bus.clone();
            async move { open_source(&event_bus, &stream).await }
        })
        .await
    }

    /// Start one consumer per enabled upstream over sources from `open`
    ///
    /// `open` receives the upstream's stream name. Every source is opened
    /// before the first consumer starts; if any fails, no consumer runs.
    pub async fn spawn_invalidation_consumers_with<F, Fut>(
        &self,
        shutdown: CancellationToken,
        mut open: F,
    ) -> Result<ConsumerHandles>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<Box<dyn InvalidationSource>>>,
    {
        let users = &self.config.upstreams.users;
        let products = &self.config.upstreams.products;

        let users_source = if users.invalidation.enabled {
            Some(open(users.invalidation.stream.clone()).await?)
        } else {
            None
        };
        let products_source = if products.invalidation.enabled {
            Some(open(products.invalidation.stream.clone()).await?)
        } else {
            None
        };

        let mut handles = ConsumerHandles::new(shutdown);
        if let Some(source) = users_source {
            let task = self.spawn_consumer::<UserDto>(source, users, handles.token());
            handles.push("users", task);
        }
        if let Some(source) = products_source {
            let task = self.spawn_consumer::<ProductDto>(source, products, handles.token());
            handles.push("products", task);
        }

        info!(consumers = handles.len(), "Invalidation consumers started");
        Ok(handles)
    }

    /// Start a consumer for entity type `E` reading `source`
    pub fn spawn_consumer<E: RemoteEntity>(
        &self,
        mut source: Box<dyn InvalidationSource>,
        upstream: &UpstreamConfig,
        shutdown: CancellationToken,
    ) -> JoinHandle<ConsumerReport> {
        let consumer =
            InvalidationConsumer::<E>::new(self.cache.clone(), upstream.cache.entry_config());
        tokio::spawn(async move { consumer.run(source.as_mut(), shutdown).await })
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("cache", &self.cache.provider_name())
            .field("users", &self.users)
            .field("products", &self.products)
            .finish_non_exhaustive()
    }
}

fn lookup_client<E: RemoteEntity>(
    transport: Arc<dyn UpstreamTransport>,
    cache: Arc<dyn CacheProvider>,
    upstream: &UpstreamConfig,
) -> RemoteLookupClient<E> {
    let engine = Arc::new(PolicyEngine::new(
        transport.upstream_name().to_string(),
        &upstream.policy,
    ));
    RemoteLookupClient::new(transport, cache, engine, upstream.cache.entry_config())
}

async fn open_source(
    event_bus: &EventBusConfig,
    stream: &str,
) -> Result<Box<dyn InvalidationSource>> {
    match event_bus.provider {
        EventBusProvider::Null => Ok(Box::new(NullInvalidationSource::new())),
        EventBusProvider::Nats => open_nats_source(event_bus, stream).await,
    }
}

#[cfg(feature = "events-nats")]
async fn open_nats_source(
    event_bus: &EventBusConfig,
    stream: &str,
) -> Result<Box<dyn InvalidationSource>> {
    use ors_domain::error::Error;
    use ors_providers::events::{NatsInvalidationSource, NatsSourceConfig};

    let url = event_bus
        .nats_url
        .as_deref()
        .ok_or_else(|| Error::config("NATS URL is required when the NATS event bus is selected"))?;
    let mut source_config = NatsSourceConfig::new(url, stream, &event_bus.durable_name(stream));
    source_config.client_name.clone_from(&event_bus.nats_client_name);
    Ok(Box::new(NatsInvalidationSource::connect(&source_config).await?))
}

#[cfg(not(feature = "events-nats"))]
async fn open_nats_source(
    _event_bus: &EventBusConfig,
    _stream: &str,
) -> Result<Box<dyn InvalidationSource>> {
    Err(ors_domain::error::Error::config(
        "NATS event bus support is not compiled in (enable the `events-nats` feature)",
    ))
}

/// Running invalidation consumers
#[derive(Debug)]
pub struct ConsumerHandles {
    shutdown: CancellationToken,
    tasks: Vec<(String, JoinHandle<ConsumerReport>)>,
}

impl ConsumerHandles {
    /// Empty set stopped by `shutdown`
    pub fn new(shutdown: CancellationToken) -> Self {
        Self {
            shutdown,
            tasks: Vec::new(),
        }
    }

    /// Track a running consumer
    pub fn push(&mut self, name: impl Into<String>, task: JoinHandle<ConsumerReport>) {
        self.tasks.push((name.into(), task));
    }

    /// Token that stops the tracked consumers
    pub fn token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Number of tracked consumers
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when no consumer is tracked
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Cancel every consumer and wait for it to settle its current delivery
    pub async fn shutdown(self) -> Vec<(String, ConsumerReport)> {
        self.shutdown.cancel();
        self.join().await
    }

    /// Wait for every consumer to stop on its own
    pub async fn join(self) -> Vec<(String, ConsumerReport)> {
        let mut reports = Vec::with_capacity(self.tasks.len());
        for (name, task) in self.tasks {
            match task.await {
                Ok(report) => reports.push((name, report)),
                Err(e) => error!(consumer = %name, error = %e, "Invalidation consumer task failed"),
            }
        }
        reports
    }
}
