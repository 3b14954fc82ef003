//! Lookup results

use serde::{Deserialize, Serialize};

/// Outcome of a remote entity lookup as seen by the order path
///
/// Every non-caller failure is absorbed into one of these variants, so the
/// order path always receives a usable answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "entity", rename_all = "snake_case")]
pub enum Lookup<E> {
    /// The upstream (or the cache) returned the entity
    Found(E),
    /// The upstream answered that the entity does not exist
    NotFound,
    /// The upstream could not be reached; the value is a placeholder
    Degraded(E),
}

impl<E> Lookup<E> {
    /// The entity, real or placeholder
    pub fn entity(&self) -> Option<&E> {
        match self {
            Self::Found(e) | Self::Degraded(e) => Some(e),
            Self::NotFound => None,
        }
    }

    /// Consume into the entity, real or placeholder
    pub fn into_entity(self) -> Option<E> {
        match self {
            Self::Found(e) | Self::Degraded(e) => Some(e),
            Self::NotFound => None,
        }
    }

    /// True when the value came from the fallback policy
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    /// True when the upstream reported the entity missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
