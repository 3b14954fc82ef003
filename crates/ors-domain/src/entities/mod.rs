//! Domain Entities
//!
//! Entities fetched from the upstream services and the order view they
//! enrich.
//!
//! | Entity | Description |
//! |--------|-------------|
//! | [`UserDto`] | User as served by the users directory |
//! | [`ProductDto`] | Product as served by the product catalog |
//! | [`Order`] | Stored order referencing users and products by id |
//! | [`EnrichedOrder`] | Order with user and product details filled in |

/// Order aggregate view
pub mod order;
/// Product catalog entity
pub mod product;
/// Users directory entity
pub mod user;

pub use order::{EnrichedOrder, EnrichedOrderItem, Order, OrderItem};
pub use product::ProductDto;
pub use user::UserDto;

use crate::value_objects::EntityKind;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// An entity that can be looked up by id from an upstream service
///
/// Binds the entity to its [`EntityKind`] (and therefore its cache keys)
/// and provides the placeholder returned when the upstream is unavailable.
pub trait RemoteEntity:
    Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + 'static
{
    /// Entity type served by the upstream
    const KIND: EntityKind;

    /// Identity of this entity
    fn entity_id(&self) -> Uuid;

    /// Placeholder marked as temporarily unavailable
    fn unavailable() -> Self;

    /// True for placeholders produced by [`Self::unavailable`]
    fn is_unavailable(&self) -> bool {
        self.entity_id().is_nil()
    }
}
