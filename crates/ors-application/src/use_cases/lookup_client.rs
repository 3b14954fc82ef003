//! Remote Lookup Client Use Case
//!
//! Cache-aside lookup of one entity type:
//!
//! 1. Read `{entity-type}:{id}` from the cache; a hit returns at once.
//! 2. On a miss, call the upstream through the policy engine.
//! 3. Cache only confirmed positive results. Not-found answers and
//!    degraded placeholders are returned but never written.
//!
//! A failing cache never fails a lookup: read errors become misses and
//! write errors are logged.

use crate::domain_services::EntityLookup;
use crate::resilience::{CallOutcome, PolicyEngine, fallback};
use async_trait::async_trait;
use ors_domain::entities::RemoteEntity;
use ors_domain::error::Result;
use ors_domain::ports::{CacheProvider, UpstreamResponse, UpstreamTransport};
use ors_domain::value_objects::{CacheEntryConfig, Lookup, RequestContext};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Cache-aside, policy-guarded lookup client for entity type `E`
pub struct RemoteLookupClient<E: RemoteEntity> {
    transport: Arc<dyn UpstreamTransport>,
    cache: Arc<dyn CacheProvider>,
    engine: Arc<PolicyEngine>,
    cache_config: CacheEntryConfig,
    _entity: PhantomData<fn() -> E>,
}

impl<E: RemoteEntity> RemoteLookupClient<E> {
    /// Create a lookup client
    ///
    /// `engine` must be the one shared by every client of the same upstream.
    pub fn new(
        transport: Arc<dyn UpstreamTransport>,
        cache: Arc<dyn CacheProvider>,
        engine: Arc<PolicyEngine>,
        cache_config: CacheEntryConfig,
    ) -> Self {
        Self {
            transport,
            cache,
            engine,
            cache_config,
            _entity: PhantomData,
        }
    }

    /// The policy engine guarding this client's upstream
    pub fn engine(&self) -> &Arc<PolicyEngine> {
        &self.engine
    }

    /// Expiration applied to cached entities
    pub fn cache_config(&self) -> CacheEntryConfig {
        self.cache_config
    }

    /// Fetch an entity by id
    pub async fn fetch_by_id(&self, id: Uuid, ctx: &RequestContext) -> Result<Lookup<E>> {
        let key = E::KIND.cache_key(id).to_string();

        if let Some(entity) = self.cached(&key).await {
            debug!(key = %key, "Cache hit");
            return Ok(Lookup::Found(entity));
        }

        let result = self.engine.execute(|| self.fetch_once(id, ctx)).await;
        let lookup = fallback::resolve(self.engine.upstream(), result)?;

        if let Lookup::Found(entity) = &lookup {
            self.store(&key, entity).await;
        }

        Ok(lookup)
    }

    async fn cached(&self, key: &str) -> Option<E> {
        let json = match self.cache.get_json(key).await {
            Ok(json) => json?,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache unavailable, treating as miss");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!(key = %key, error = %e, "Undecodable cache entry, treating as miss");
                None
            }
        }
    }

    async fn store(&self, key: &str, entity: &E) {
        let json = match serde_json::to_string(entity) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize entity for cache");
                return;
            }
        };
        if let Err(e) = self.cache.set_json(key, &json, self.cache_config).await {
            warn!(key = %key, error = %e, "Cache unavailable, skipping write");
        }
    }

    async fn fetch_once(&self, id: Uuid, ctx: &RequestContext) -> CallOutcome<E> {
        match self.transport.fetch(E::KIND, id, ctx).await {
            UpstreamResponse::Found(body) => match serde_json::from_str::<E>(&body) {
                Ok(entity) => CallOutcome::Success(entity),
                Err(e) => CallOutcome::TransientFailure(format!(
                    "undecodable {} payload: {e}",
                    E::KIND
                )),
            },
            UpstreamResponse::NotFound => CallOutcome::NotFound,
            UpstreamResponse::BadRequest(reason) => CallOutcome::CallerError(reason),
            UpstreamResponse::Unavailable(reason) => CallOutcome::TransientFailure(reason),
        }
    }
}

#[async_trait]
impl<E: RemoteEntity> EntityLookup<E> for RemoteLookupClient<E> {
    async fn fetch_by_id(&self, id: Uuid, ctx: &RequestContext) -> Result<Lookup<E>> {
        RemoteLookupClient::fetch_by_id(self, id, ctx).await
    }
}

impl<E: RemoteEntity> std::fmt::Debug for RemoteLookupClient<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteLookupClient")
            .field("entity_type", &E::KIND)
            .field("upstream", &self.engine.upstream())
            .field("cache", &self.cache.provider_name())
            .field("cache_config", &self.cache_config)
            .finish_non_exhaustive()
    }
}
