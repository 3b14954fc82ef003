//! External Provider Ports
//!
//! | Port | Description |
//! |------|-------------|
//! | CacheProvider | Key-value store with absolute and sliding expiration |
//! | UpstreamTransport | Lookup-by-id call to a user or product service |

/// Cache provider port
pub mod cache;
/// Upstream transport port
pub mod upstream;

pub use cache::{CacheProvider, CacheStats};
pub use upstream::{UpstreamResponse, UpstreamTransport};
