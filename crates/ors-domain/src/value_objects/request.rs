//! Request-scoped context

use serde::{Deserialize, Serialize};

/// Caller-scoped data forwarded to the upstream on every lookup
///
/// The authorization value is opaque: it is copied into the upstream
/// request unchanged and never inspected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Value of the incoming `Authorization` header, if any
    pub authorization: Option<String>,
}

impl RequestContext {
    /// Empty context (anonymous lookup)
    pub fn new() -> Self {
        Self::default()
    }

    /// Context forwarding the given authorization header value
    pub fn with_authorization<S: Into<String>>(authorization: S) -> Self {
        let value = authorization.into();
        Self {
            authorization: (!value.trim().is_empty()).then_some(value),
        }
    }
}
