//! Upstream HTTP transport
//!
//! Lookup-by-id calls against the users directory and the product catalog,
//! with the HTTP status already classified for the resilience engine.

pub mod transport;

pub use transport::{HttpClientConfig, HttpUpstreamTransport};
