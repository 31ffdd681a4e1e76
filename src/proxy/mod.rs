//! Transparent forwarding to backend services.
//!
//! # Data Flow
//! ```text
//! Admitted, authenticated request
//!     → routing table (which backend, which rewrite)
//!     → circuit breaker query (open → 503, no backend contact)
//!     → forwarder.rs (hyper client, streamed body, timeout)
//!     → outcome reported back to the circuit breaker
//! ```
//!
//! # Design Decisions
//! - Bodies stream through; the gateway never buffers or transforms them
//! - A response with any status counts as success for the breaker;
//!   only transport failures and timeouts count as failures
//! - Fail fast, no retries; callers decide when to try again

pub mod forwarder;

pub use forwarder::{forward_handler, UpstreamTarget};
