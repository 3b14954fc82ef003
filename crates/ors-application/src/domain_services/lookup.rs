//! Lookup service interfaces

use async_trait::async_trait;
use ors_domain::entities::{EnrichedOrder, Order, RemoteEntity};
use ors_domain::error::Result;
use ors_domain::value_objects::{Lookup, RequestContext};
use uuid::Uuid;

/// Lookup of one remote entity type by id
#[async_trait]
pub trait EntityLookup<E: RemoteEntity>: Send + Sync {
    /// Fetch the entity, from cache or from its upstream
    ///
    /// Only caller errors are returned as `Err`; every other failure is
    /// absorbed into [`Lookup::Degraded`].
    async fn fetch_by_id(&self, id: Uuid, ctx: &RequestContext) -> Result<Lookup<E>>;
}

/// Order enrichment and reference validation
#[async_trait]
pub trait OrderEnrichmentInterface: Send + Sync {
    /// Fill an order with user and product details
    async fn enrich(&self, order: &Order, ctx: &RequestContext) -> Result<EnrichedOrder>;

    /// Fail with `NotFound` if the user or any product does not exist
    async fn ensure_references_exist(
        &self,
        user_id: Uuid,
        product_ids: &[Uuid],
        ctx: &RequestContext,
    ) -> Result<()>;
}
