//! Main application configuration

use super::cache::CacheConfig;
use super::event_bus::EventBusConfig;
use super::logging::LoggingConfig;
use super::upstream::UpstreamsConfig;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Shared cache store
    pub cache: CacheConfig,
    /// Source of invalidation events
    pub event_bus: EventBusConfig,
    /// Remote services
    pub upstreams: UpstreamsConfig,
}
