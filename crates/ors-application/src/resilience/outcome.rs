//! Call outcomes and policy errors
//!
//! The innermost call reports a closed set of outcomes; the engine matches
//! on them to decide what the breaker records and whether to retry.

use std::time::Duration;
use thiserror::Error;

/// Classified result of one upstream call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome<T> {
    /// The entity was returned
    Success(T),
    /// The upstream answered that the entity does not exist
    NotFound,
    /// The upstream rejected the request as malformed
    CallerError(String),
    /// Network error, 5xx-equivalent response or undecodable payload
    TransientFailure(String),
}

impl<T> CallOutcome<T> {
    /// Whether the upstream answered in a way that says it is healthy
    pub fn is_healthy(&self) -> bool {
        !matches!(self, Self::TransientFailure(_))
    }
}

/// Why a guarded call produced no value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The breaker is open (or its half-open trial is taken)
    #[error("circuit open")]
    CircuitOpen,

    /// Concurrency and queue capacity are both exhausted
    #[error("bulkhead rejected the call")]
    BulkheadRejected,

    /// The call did not finish in time
    #[error("call timed out after {0:?}")]
    Timeout(Duration),

    /// The upstream failed transiently
    #[error("transient upstream failure: {0}")]
    Transient(String),

    /// The upstream rejected the request as malformed
    #[error("caller error: {0}")]
    CallerError(String),
}

impl PolicyError {
    /// Whether another attempt could succeed
    ///
    /// Breaker and bulkhead rejections are surfaced at once; retrying them
    /// within the same break or queue window cannot help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transient(_))
    }
}
