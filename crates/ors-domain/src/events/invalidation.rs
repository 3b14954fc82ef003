//! Entity change events
//!
//! Delivered at least once; applying the same event twice must leave the
//! cache in the same state as applying it once.

use crate::entities::RemoteEntity;
use crate::error::{Error, Result};
use crate::value_objects::{CacheKey, EntityKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of change an upstream reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Entity changed; the event carries the new snapshot
    Updated,
    /// Entity removed; the event carries only the id
    Deleted,
}

impl ChangeKind {
    /// Wire name (`updated` / `deleted`), also used as routing header value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "updated" => Ok(Self::Updated),
            "deleted" => Ok(Self::Deleted),
            other => Err(Error::invalid_argument(format!(
                "Unknown change kind '{other}'"
            ))),
        }
    }
}

/// Entity change published by an upstream service
///
/// JSON form:
///
/// ```json
/// {"entityType":"product","entityId":"…","event":"updated","snapshot":{…}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidationEvent {
    /// Type of the changed entity
    pub entity_type: EntityKind,
    /// Identity of the changed entity
    pub entity_id: Uuid,
    /// What happened
    pub event: ChangeKind,
    /// Full entity after the change (`updated` only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<serde_json::Value>,
    /// When the upstream recorded the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl InvalidationEvent {
    /// Event announcing that an entity was removed
    pub fn deleted(entity_type: EntityKind, entity_id: Uuid) -> Self {
        Self {
            entity_type,
            entity_id,
            event: ChangeKind::Deleted,
            snapshot: None,
            occurred_at: Some(Utc::now()),
        }
    }

    /// Event carrying the new state of an entity
    pub fn updated<E: RemoteEntity>(entity: &E) -> Result<Self> {
        Ok(Self {
            entity_type: E::KIND,
            entity_id: entity.entity_id(),
            event: ChangeKind::Updated,
            snapshot: Some(serde_json::to_value(entity)?),
            occurred_at: Some(Utc::now()),
        })
    }

    /// Cache key this event applies to
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.entity_type, self.entity_id)
    }

    /// Decode an event from a message body
    pub fn from_slice(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload)
            .map_err(|e| Error::invalidation(format!("Malformed invalidation event: {e}")))
    }

    /// Encode the event as a message body
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
