//! Per-upstream resilience parameters

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resilience parameters consumed by the policy engine of one upstream
///
/// Defaults match the product catalog deployment; [`Self::users`] returns
/// the users directory defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamPolicyConfig {
    /// Retries after the first attempt on transient failures
    pub retry_count: u32,
    /// Backoff base: retry `n` waits `base^n` seconds
    pub retry_backoff_base_secs: f64,
    /// Consecutive failures that open the circuit
    pub failure_threshold: u32,
    /// How long the circuit stays open before a trial call (seconds)
    pub break_duration_secs: u64,
    /// Per-attempt timeout (milliseconds)
    pub timeout_ms: u64,
    /// Calls admitted concurrently by the bulkhead
    pub max_concurrent: usize,
    /// Callers allowed to wait for a bulkhead slot
    pub max_queued: usize,
}

impl UpstreamPolicyConfig {
    /// Defaults for the users directory
    pub fn users() -> Self {
        Self {
            retry_count: 4,
            failure_threshold: 3,
            break_duration_secs: 180,
            timeout_ms: 1500,
            max_concurrent: 10,
            max_queued: 100,
            ..Self::products()
        }
    }

    /// Defaults for the product catalog
    pub fn products() -> Self {
        Self {
            retry_count: 3,
            retry_backoff_base_secs: 2.0,
            failure_threshold: 5,
            break_duration_secs: 30,
            timeout_ms: 5000,
            max_concurrent: 2,
            max_queued: 30,
        }
    }

    /// Per-attempt timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Open-state duration
    pub fn break_duration(&self) -> Duration {
        Duration::from_secs(self.break_duration_secs)
    }
}

impl Default for UpstreamPolicyConfig {
    fn default() -> Self {
        Self::products()
    }
}
