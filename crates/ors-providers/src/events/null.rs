//! Null Invalidation Source
//!
//! Used when no broker is configured; the consumer loop ends at once.

use async_trait::async_trait;
use ors_domain::error::Result;
use ors_domain::ports::{Delivery, InvalidationSource};

/// Invalidation source that never delivers anything
#[derive(Debug, Clone, Default)]
pub struct NullInvalidationSource;

impl NullInvalidationSource {
    /// Create a new null source
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InvalidationSource for NullInvalidationSource {
    async fn next_delivery(&mut self) -> Option<Result<Delivery>> {
        None
    }

    fn source_name(&self) -> &str {
        "null"
    }
}
