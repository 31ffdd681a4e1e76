//! HTTP server and gateway middleware.
//!
//! # Data Flow
//! ```text
//! Incoming Request
//!     → cors.rs (preflight + response headers)
//!     → request_id.rs (correlation id + completion log)
//!     → security::rate_limit (admission)
//!     → security::auth (identity)
//!     → health.rs or proxy::forwarder (terminal handler)
//! ```
//!
//! # Design Decisions
//! - Middleware order is fixed; every request walks the same chain
//! - Each stage writes its own terminal rejection, nothing bubbles past
//! - Panics anywhere are caught and rendered as INTERNAL_SERVER_ERROR

pub mod cors;
pub mod error;
pub mod health;
pub mod request_id;
pub mod server;

pub use server::{AppState, HttpServer};
