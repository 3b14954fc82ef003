//! Order Enrichment Use Case
//!
//! Fills stored orders with user and product details fetched through the
//! lookup clients, and validates that an order's references exist.
//!
//! Degraded lookups contribute their placeholder values and mark the
//! enriched order as degraded; not-found lookups leave fields empty.

use crate::domain_services::{EntityLookup, OrderEnrichmentInterface};
use async_trait::async_trait;
use futures::future::try_join_all;
use ors_domain::entities::{
    EnrichedOrder, EnrichedOrderItem, Order, OrderItem, ProductDto, UserDto,
};
use ors_domain::error::{Error, Result};
use ors_domain::value_objects::{EntityKind, Lookup, RequestContext};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Order enrichment over the user and product lookups
#[derive(Clone)]
pub struct OrderEnrichmentService {
    users: Arc<dyn EntityLookup<UserDto>>,
    products: Arc<dyn EntityLookup<ProductDto>>,
}

impl OrderEnrichmentService {
    /// Create the service from the two lookups
    pub fn new(
        users: Arc<dyn EntityLookup<UserDto>>,
        products: Arc<dyn EntityLookup<ProductDto>>,
    ) -> Self {
        Self { users, products }
    }

    /// Enrich several orders, one after another
    pub async fn enrich_all(
        &self,
        orders: &[Order],
        ctx: &RequestContext,
    ) -> Result<Vec<EnrichedOrder>> {
        let mut enriched = Vec::with_capacity(orders.len());
        for order in orders {
            enriched.push(self.enrich(order, ctx).await?);
        }
        Ok(enriched)
    }

    async fn lookup_products(
        &self,
        ids: &[Uuid],
        ctx: &RequestContext,
    ) -> Result<HashMap<Uuid, Lookup<ProductDto>>> {
        let lookups = try_join_all(ids.iter().map(|id| self.products.fetch_by_id(*id, ctx))).await?;
        Ok(ids.iter().copied().zip(lookups).collect())
    }
}

fn enrich_item(
    item: &OrderItem,
    product: Option<&ProductDto>,
) -> EnrichedOrderItem {
    EnrichedOrderItem {
        product_id: item.product_id,
        unit_price: item.unit_price,
        quantity: item.quantity,
        total_price: item.total_price(),
        product_name: product.map(|p| p.product_name.clone()),
        category: product.map(|p| p.category.clone()),
        img_url: product.and_then(|p| p.img_url.clone()),
    }
}

#[async_trait]
impl OrderEnrichmentInterface for OrderEnrichmentService {
    async fn enrich(&self, order: &Order, ctx: &RequestContext) -> Result<EnrichedOrder> {
        let user = self.users.fetch_by_id(order.user_id, ctx).await?;
        let products = self.lookup_products(&order.product_ids(), ctx).await?;

        let degraded = user.is_degraded() || products.values().any(Lookup::is_degraded);
        if degraded {
            debug!(order_id = %order.order_id, "Enriching order with degraded lookups");
        }

        let items = order
            .items
            .iter()
            .map(|item| {
                let product = products.get(&item.product_id).and_then(Lookup::entity);
                enrich_item(item, product)
            })
            .collect();

        let user = user.entity();
        Ok(EnrichedOrder {
            order_id: order.order_id,
            user_id: order.user_id,
            total_bill: order.total_bill(),
            order_date: order.order_date,
            name: user.and_then(|u| u.name.clone()),
            email: user.and_then(|u| u.email.clone()),
            items,
            degraded,
        })
    }

    async fn ensure_references_exist(
        &self,
        user_id: Uuid,
        product_ids: &[Uuid],
        ctx: &RequestContext,
    ) -> Result<()> {
        if self.users.fetch_by_id(user_id, ctx).await?.is_not_found() {
            return Err(Error::not_found(EntityKind::User.cache_key(user_id).to_string()));
        }

        let products = self.lookup_products(product_ids, ctx).await?;
        if let Some(missing) = product_ids
            .iter()
            .find(|id| products.get(*id).is_some_and(Lookup::is_not_found))
        {
            return Err(Error::not_found(
                EntityKind::Product.cache_key(*missing).to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for OrderEnrichmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEnrichmentService").finish_non_exhaustive()
    }
}
