//! Configuration types module

pub mod app;
pub mod cache;
pub mod event_bus;
pub mod logging;
pub mod upstream;

// Re-export main types
pub use app::AppConfig;
pub use cache::{CacheBackend, CacheConfig};
pub use event_bus::{EventBusConfig, EventBusProvider};
pub use logging::LoggingConfig;
pub use upstream::{InvalidationConfig, UpstreamCacheConfig, UpstreamConfig, UpstreamsConfig};
