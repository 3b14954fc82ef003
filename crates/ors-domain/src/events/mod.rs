//! Domain Events
//!
//! Events published by the upstream services when an entity changes.
//!
//! | Event | Description |
//! |-------|-------------|
//! | [`InvalidationEvent`] | An entity was updated or deleted upstream |
//! | [`ChangeKind`] | Which of the two happened |

/// Entity change events
pub mod invalidation;

pub use invalidation::{ChangeKind, InvalidationEvent};
