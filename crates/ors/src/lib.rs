//! # Orders Lookup Service
//!
//! Resilient, cached lookups of users and products for the order path, with
//! cache invalidation driven by the upstream services' change events.
//!
//! ## Example
//!
//! ```ignore
//! use ors::infrastructure::{ConfigLoader, ServiceContainer};
//! use ors::domain::RequestContext;
//!
//! let config = ConfigLoader::new().load()?;
//! let container = ServiceContainer::build(&config)?;
//!
//! // Found, NotFound or a Degraded placeholder; only caller errors fail
//! let product = container.products().fetch_by_id(id, &RequestContext::new()).await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Entities, events, value objects and port traits
//! - `application` - Resilience policy engine, lookup client, invalidation consumer
//! - `providers` - Cache stores, HTTP transport and invalidation sources
//! - `infrastructure` - Configuration, logging and the service container
//! - `cli` - The `ors` command line

/// Domain layer - core types and port traits
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use ors_domain::*;
}

/// Application layer - resilience and use cases
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use ors_application::*;
}

/// Provider implementations
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use ors_providers::*;
}

/// Infrastructure layer - config, logging and service wiring
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use ors_infrastructure::*;
}

pub mod cli;

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export main entry point at the crate root
pub use cli::{Cli, run};
