//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (ordered prefix scan)
//!     → Return: matched Route (service + rewrite rule) or no match
//! ```
//!
//! # Design Decisions
//! - Route table is static and immutable (thread-safe without locks)
//! - Prefix matching is segment-aware; no regex in the hot path
//! - First match wins, table order is the priority order

pub mod router;

use std::fmt;

pub use router::{Route, RouteTable};

/// The fixed set of backend services the gateway forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceName {
    User,
    Content,
    Notification,
}

impl ServiceName {
    pub const ALL: [ServiceName; 3] = [
        ServiceName::User,
        ServiceName::Content,
        ServiceName::Notification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::User => "user-service",
            ServiceName::Content => "content-service",
            ServiceName::Notification => "notification-service",
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
