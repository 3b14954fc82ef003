//! Configuration
//!
//! Typed configuration for the whole service and the figment-based loader
//! that layers defaults, a TOML file and `ORS_*` environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::*;
