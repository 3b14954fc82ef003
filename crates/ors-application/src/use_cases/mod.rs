//! Use case implementations

pub mod invalidation_consumer;
pub mod lookup_client;
pub mod order_enrichment;

pub use invalidation_consumer::{ConsumerReport, DeliveryOutcome, InvalidationConsumer};
pub use lookup_client::RemoteLookupClient;
pub use order_enrichment::OrderEnrichmentService;
