//! EventBus configuration types

use crate::constants::{DEFAULT_DURABLE_PREFIX, DEFAULT_NATS_CLIENT_NAME};
use serde::{Deserialize, Serialize};

/// EventBus provider types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventBusProvider {
    /// No invalidation events; cached entries only expire
    #[default]
    Null,
    /// NATS JetStream durable consumers
    Nats,
}

/// EventBus configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBusConfig {
    /// EventBus provider to use
    pub provider: EventBusProvider,

    /// NATS server URL (for NATS provider)
    /// Example: "nats://localhost:4222"
    pub nats_url: Option<String>,

    /// NATS client name (for NATS provider)
    pub nats_client_name: Option<String>,

    /// Prefix of durable consumer names; one consumer per stream
    pub durable_prefix: String,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            provider: EventBusProvider::Null,
            nats_url: None,
            nats_client_name: Some(DEFAULT_NATS_CLIENT_NAME.to_string()),
            durable_prefix: DEFAULT_DURABLE_PREFIX.to_string(),
        }
    }
}

impl EventBusConfig {
    /// Create config for NATS
    pub fn nats(url: impl Into<String>) -> Self {
        Self {
            provider: EventBusProvider::Nats,
            nats_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Create config with no event bus
    pub fn null() -> Self {
        Self::default()
    }

    /// Durable consumer name for a stream
    pub fn durable_name(&self, stream: &str) -> String {
        format!("{}-{stream}", self.durable_prefix)
    }
}
