//! Resilience Policy Engine
//!
//! Composable guards around an idempotent upstream call, applied in a fixed
//! order from outermost to innermost:
//!
//! ```text
//! Retry -> CircuitBreaker -> Bulkhead -> Timeout -> call
//! ```
//!
//! Retry is outermost so that every attempt is a fresh admission through
//! the breaker and the bulkhead. Bulkhead sits inside the breaker so that
//! local overload never counts as upstream failure. Fallback is applied to
//! the engine's result by [`fallback::resolve`].
//!
//! | Guard | Type |
//! |-------|------|
//! | Timeout | [`TimeoutPolicy`] |
//! | Retry | [`RetryPolicy`] |
//! | CircuitBreaker | [`CircuitBreaker`] |
//! | Bulkhead | [`Bulkhead`] |
//! | Fallback | [`fallback::resolve`] |

pub mod bulkhead;
pub mod circuit_breaker;
pub mod engine;
pub mod fallback;
pub mod outcome;
pub mod retry;
pub mod timeout;

pub use bulkhead::{Bulkhead, BulkheadGuard};
pub use circuit_breaker::{CircuitBreaker, CircuitPermit, CircuitPhase};
pub use engine::PolicyEngine;
pub use outcome::{CallOutcome, PolicyError};
pub use retry::{RetryAttempt, RetryPolicy};
pub use timeout::TimeoutPolicy;
