//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → env.rs (read & parse, fall back to defaults)
//!     → GatewayConfig (immutable after startup)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - Every field has a default so the gateway runs with zero env vars
//! - Unparseable values fall back to the default rather than aborting

pub mod env;
pub mod schema;

pub use schema::CircuitBreakerConfig;
pub use schema::CorsConfig;
pub use schema::GatewayConfig;
pub use schema::RateLimitConfig;
pub use schema::ServiceEndpoints;
pub use schema::TimeoutConfig;
