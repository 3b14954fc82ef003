//! Application Layer - Orders Lookup Service
//!
//! Use cases and the resilience machinery behind every remote lookup the
//! order path performs.
//!
//! ## Architecture
//!
//! The application layer:
//! - Guards upstream calls with the resilience policy engine
//! - Implements the cache-aside lookup client and the invalidation consumer
//! - Orchestrates both lookups to enrich orders
//! - Has no dependencies on infrastructure or concrete providers
//!
//! ## Modules
//!
//! - `resilience`: Timeout, Retry, CircuitBreaker, Bulkhead and Fallback
//! - `use_cases`: Lookup client, invalidation consumer, order enrichment
//! - `domain_services`: Use case interfaces
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `ors-domain`: For entities, value objects and port traits
//! - Pure Rust libraries for async, serialization, etc.

pub mod domain_services;
pub mod resilience;
pub mod use_cases;

pub use domain_services::*;
pub use resilience::{
    Bulkhead, CallOutcome, CircuitBreaker, CircuitPhase, PolicyEngine, PolicyError, RetryPolicy,
    TimeoutPolicy,
};
pub use use_cases::*;
