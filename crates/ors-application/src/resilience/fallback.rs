//! Fallback
//!
//! Turns the engine's result into what the order path receives: a real
//! entity, not-found, or the entity's degraded placeholder. Only caller
//! errors escape as errors.

use super::outcome::PolicyError;
use ors_domain::entities::RemoteEntity;
use ors_domain::error::{Error, Result};
use ors_domain::value_objects::Lookup;
use tracing::warn;

/// Apply the fallback to a guarded call's result
pub fn resolve<E: RemoteEntity>(
    upstream: &str,
    result: std::result::Result<Option<E>, PolicyError>,
) -> Result<Lookup<E>> {
    match result {
        Ok(Some(entity)) => Ok(Lookup::Found(entity)),
        Ok(None) => Ok(Lookup::NotFound),
        Err(PolicyError::CallerError(reason)) => Err(Error::caller(upstream, reason)),
        Err(error) => {
            warn!(
                upstream,
                entity_type = %E::KIND,
                %error,
                "Upstream unavailable, returning placeholder"
            );
            Ok(Lookup::Degraded(E::unavailable()))
        }
    }
}
