//! Circuit breaker
//!
//! Consecutive-failure breaker with a single half-open trial.
//!
//! | Phase | Behaviour |
//! |-------|-----------|
//! | `Closed` | Calls pass; `failure_threshold` consecutive failures open the circuit |
//! | `Open` | Calls fail fast until `break_duration` has elapsed since opening |
//! | `HalfOpen` | Exactly one trial passes; its success closes, its failure reopens |
//!
//! State lives behind one mutex that is never held across an await, so
//! every caller observes the same phase at the same instant.

use super::outcome::PolicyError;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Circuit breaker phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitPhase {
    /// Normal operation
    Closed,
    /// Failing fast
    Open,
    /// Probing with a single trial call
    HalfOpen,
}

impl fmt::Display for CircuitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half-open"),
        }
    }
}

#[derive(Debug)]
struct BreakerState {
    phase: CircuitPhase,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

/// Per-upstream circuit breaker
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    failure_threshold: u32,
    break_duration: Duration,
    state: Mutex<BreakerState>,
}

impl CircuitBreaker {
    /// Create a closed breaker
    pub fn new(name: impl Into<String>, failure_threshold: u32, break_duration: Duration) -> Self {
        Self {
            name: name.into(),
            failure_threshold: failure_threshold.max(1),
            break_duration,
            state: Mutex::new(BreakerState {
                phase: CircuitPhase::Closed,
                consecutive_failures: 0,
                opened_at: None,
                trial_in_flight: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current phase
    ///
    /// An open breaker whose break has elapsed still reports `Open` until
    /// the next call moves it to `HalfOpen`.
    pub fn phase(&self) -> CircuitPhase {
        self.lock().phase
    }

    /// Consecutive failures counted while closed
    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }

    /// Breaker name (the upstream it guards)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ask to let one call through
    ///
    /// Fails with [`PolicyError::CircuitOpen`] while open, and while half-open
    /// if the trial is already taken. The returned permit must be settled
    /// with the call's outcome; dropping it unsettled is neutral.
    pub fn try_acquire(&self) -> Result<CircuitPermit<'_>, PolicyError> {
        let mut state = self.lock();
        match state.phase {
            CircuitPhase::Closed => Ok(CircuitPermit::new(self, false)),
            CircuitPhase::Open => {
                let elapsed = state
                    .opened_at
                    .is_none_or(|opened| opened.elapsed() >= self.break_duration);
                if !elapsed {
                    return Err(PolicyError::CircuitOpen);
                }
                state.phase = CircuitPhase::HalfOpen;
                state.trial_in_flight = true;
                info!(
                    upstream = %self.name,
                    from = %CircuitPhase::Open,
                    to = %CircuitPhase::HalfOpen,
                    "Circuit breaker state transition"
                );
                Ok(CircuitPermit::new(self, true))
            }
            CircuitPhase::HalfOpen if state.trial_in_flight => Err(PolicyError::CircuitOpen),
            CircuitPhase::HalfOpen => {
                state.trial_in_flight = true;
                Ok(CircuitPermit::new(self, true))
            }
        }
    }

    fn on_success(&self, trial: bool) {
        let mut state = self.lock();
        if trial {
            state.phase = CircuitPhase::Closed;
            state.consecutive_failures = 0;
            state.opened_at = None;
            state.trial_in_flight = false;
            info!(
                upstream = %self.name,
                from = %CircuitPhase::HalfOpen,
                to = %CircuitPhase::Closed,
                "Circuit breaker state transition"
            );
        } else if state.phase == CircuitPhase::Closed {
            state.consecutive_failures = 0;
        }
    }

    fn on_failure(&self, trial: bool) {
        let mut state = self.lock();
        if trial {
            state.phase = CircuitPhase::Open;
            state.opened_at = Some(Instant::now());
            state.trial_in_flight = false;
            warn!(
                upstream = %self.name,
                from = %CircuitPhase::HalfOpen,
                to = %CircuitPhase::Open,
                break_secs = self.break_duration.as_secs(),
                "Circuit breaker state transition"
            );
        } else if state.phase == CircuitPhase::Closed {
            state.consecutive_failures += 1;
            if state.consecutive_failures >= self.failure_threshold {
                state.phase = CircuitPhase::Open;
                state.opened_at = Some(Instant::now());
                warn!(
                    upstream = %self.name,
                    from = %CircuitPhase::Closed,
                    to = %CircuitPhase::Open,
                    failures = state.consecutive_failures,
                    break_secs = self.break_duration.as_secs(),
                    "Circuit breaker state transition"
                );
            }
        }
    }

    fn on_release(&self, trial: bool) {
        if trial {
            let mut state = self.lock();
            if state.phase == CircuitPhase::HalfOpen {
                state.trial_in_flight = false;
            }
        }
    }
}

/// Admission through a [`CircuitBreaker`]
///
/// Outcomes of calls admitted while closed only move the failure counter;
/// only the half-open trial's outcome moves the phase.
#[derive(Debug)]
#[must_use = "settle the permit with the call outcome"]
pub struct CircuitPermit<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    settled: bool,
}

impl<'a> CircuitPermit<'a> {
    fn new(breaker: &'a CircuitBreaker, trial: bool) -> Self {
        Self {
            breaker,
            trial,
            settled: false,
        }
    }

    /// Whether this permit is the half-open trial
    pub fn is_trial(&self) -> bool {
        self.trial
    }

    /// The upstream answered healthily
    pub fn record_success(mut self) {
        self.settled = true;
        self.breaker.on_success(self.trial);
    }

    /// The call failed transiently or timed out
    pub fn record_failure(mut self) {
        self.settled = true;
        self.breaker.on_failure(self.trial);
    }

    /// The call never reached the upstream; nothing is recorded
    pub fn release(mut self) {
        self.settled = true;
        self.breaker.on_release(self.trial);
    }
}

impl Drop for CircuitPermit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.on_release(self.trial);
        }
    }
}
