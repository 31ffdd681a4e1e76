//! Request admission and identity.
//!
//! # Data Flow
//! ```text
//! Incoming Request
//!     → rate_limit.rs (token bucket per limit class + client key)
//!     → auth.rs (bearer token → identity headers)
//!     → continue to forwarding, or terminal 429/401
//! ```
//!
//! # Design Decisions
//! - Limiter and auth gate own their rejections and write the terminal
//!   response themselves; nothing bubbles past them
//! - Both are constructible objects held in AppState, not module globals

pub mod auth;
pub mod rate_limit;

pub use auth::AuthContext;
pub use rate_limit::{LimitClass, RateLimiter};
