//! Failure isolation for backend services.
//!
//! # Design Decisions
//! - One circuit per backend service, not global
//! - Fail fast while open; no request waits on a down backend
//! - Open → Half-Open happens lazily at query time, no background timer

pub mod circuit_breaker;

pub use circuit_breaker::{CircuitBreakerRegistry, CircuitState};
