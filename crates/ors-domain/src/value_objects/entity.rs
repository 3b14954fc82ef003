//! Entity kinds and cache keys

use crate::constants::{CACHE_KEY_SEPARATOR, PRODUCT_ENTITY_TYPE, USER_ENTITY_TYPE};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Entity types served by the upstream services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Users directory
    User,
    /// Product catalog
    Product,
}

impl EntityKind {
    /// Name used in cache keys, URLs and events
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => USER_ENTITY_TYPE,
            Self::Product => PRODUCT_ENTITY_TYPE,
        }
    }

    /// Cache key for an entity of this kind
    pub fn cache_key(&self, id: Uuid) -> CacheKey {
        CacheKey::new(*self, id)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            USER_ENTITY_TYPE | "users" => Ok(Self::User),
            PRODUCT_ENTITY_TYPE | "products" => Ok(Self::Product),
            other => Err(Error::invalid_argument(format!(
                "Unknown entity type '{other}', expected 'user' or 'product'"
            ))),
        }
    }
}

/// Cache key in the `{entity-type}:{id}` scheme
///
/// Lookups and invalidation events derive the same key from the entity
/// identity, which is what keeps the two paths pointed at one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: EntityKind,
    id: Uuid,
}

impl CacheKey {
    /// Create a key for the given entity
    pub fn new(kind: EntityKind, id: Uuid) -> Self {
        Self { kind, id }
    }

    /// Entity kind part of the key
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Entity id part of the key
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.kind, CACHE_KEY_SEPARATOR, self.id)
    }
}

impl FromStr for CacheKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, id) = s
            .split_once(CACHE_KEY_SEPARATOR)
            .ok_or_else(|| Error::invalid_argument(format!("Malformed cache key '{s}'")))?;
        let id = Uuid::parse_str(id)
            .map_err(|e| Error::invalid_argument(format!("Malformed id in cache key '{s}': {e}")))?;
        Ok(Self::new(kind.parse()?, id))
    }
}
