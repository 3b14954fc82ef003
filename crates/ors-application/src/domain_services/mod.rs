//! Use case interfaces
//!
//! Traits the order path depends on, implemented in `use_cases`.

pub mod lookup;

pub use lookup::{EntityLookup, OrderEnrichmentInterface};
