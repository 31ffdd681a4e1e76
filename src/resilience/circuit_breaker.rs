//! Per-backend circuit breaker.
//!
//! # States
//! - Closed: normal operation, requests pass through
//! - Open: backend assumed down, requests fail fast
//! - Half-Open: testing if backend recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure count exceeds threshold within window
//! Open → Half-Open: open duration elapsed (evaluated on state query)
//! Half-Open → Closed: a probe succeeds
//! Half-Open → Open: a probe fails (counted like any other failure)
//! ```
//!
//! Half-open does not serialize probes: every request arriving while
//! half-open goes through concurrently, and the first reported outcome
//! decides the transition.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::CircuitBreakerConfig;
use crate::routing::ServiceName;

/// Externally visible circuit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Per-backend failure tracking.
#[derive(Debug)]
struct Circuit {
    state: CircuitState,
    failures: u32,
    last_failure_at: Option<Instant>,
    opened_at: Option<Instant>,
}

impl Circuit {
    fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            failures: 0,
            last_failure_at: None,
            opened_at: None,
        }
    }
}

/// Registry of one circuit per backend service.
///
/// Owns all circuit state; callers only query the state and report
/// outcomes. Circuits are created lazily on first use.
pub struct CircuitBreakerRegistry {
    circuits: Mutex<HashMap<ServiceName, Circuit>>,
    failure_threshold: u32,
    failure_window: Duration,
    open_duration: Duration,
}

impl CircuitBreakerRegistry {
    pub fn new(config: &CircuitBreakerConfig) -> Self {
        Self {
            circuits: Mutex::new(HashMap::new()),
            failure_threshold: config.failure_threshold,
            failure_window: Duration::from_millis(config.failure_window_ms),
            open_duration: Duration::from_millis(config.open_duration_ms),
        }
    }

    /// Current state of the backend's circuit.
    ///
    /// An open circuit whose open duration has elapsed transitions to
    /// half-open here, as a side effect of being asked.
    pub fn state(&self, service: ServiceName) -> CircuitState {
        self.state_at(service, Instant::now())
    }

    pub fn state_at(&self, service: ServiceName, now: Instant) -> CircuitState {
        let mut circuits = self.circuits.lock().expect("circuit registry mutex poisoned");
        let circuit = circuits.entry(service).or_insert_with(Circuit::new);

        if circuit.state == CircuitState::Open {
            if let Some(opened_at) = circuit.opened_at {
                if now.duration_since(opened_at) >= self.open_duration {
                    circuit.state = CircuitState::HalfOpen;
                    tracing::info!(service = %service, "Circuit half-open, admitting probes");
                }
            }
        }

        circuit.state
    }

    /// Record a completed backend call. Closes the circuit and clears the
    /// failure count regardless of the current state.
    pub fn record_success(&self, service: ServiceName) {
        let mut circuits = self.circuits.lock().expect("circuit registry mutex poisoned");
        let circuit = circuits.entry(service).or_insert_with(Circuit::new);

        if circuit.state != CircuitState::Closed {
            tracing::info!(service = %service, "Circuit closed after successful call");
        }
        circuit.state = CircuitState::Closed;
        circuit.failures = 0;
    }

    /// Record a failed backend call (transport error or timeout).
    pub fn record_failure(&self, service: ServiceName) {
        self.record_failure_at(service, Instant::now());
    }

    pub fn record_failure_at(&self, service: ServiceName, now: Instant) {
        let mut circuits = self.circuits.lock().expect("circuit registry mutex poisoned");
        let circuit = circuits.entry(service).or_insert_with(Circuit::new);

        // Failures outside the window don't accumulate.
        if let Some(last) = circuit.last_failure_at {
            if now.duration_since(last) > self.failure_window {
                circuit.failures = 0;
            }
        }

        circuit.failures += 1;
        circuit.last_failure_at = Some(now);

        if circuit.failures > self.failure_threshold && circuit.state != CircuitState::Open {
            circuit.state = CircuitState::Open;
            circuit.opened_at = Some(now);
            tracing::warn!(
                service = %service,
                failures = circuit.failures,
                "Circuit opened"
            );
        }
    }
}
