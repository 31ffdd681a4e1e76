//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits so configs can be captured in logs or dumps.

use serde::{Deserialize, Serialize};

use crate::routing::ServiceName;

/// Root configuration for the API gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listening port for the HTTP server.
    pub port: u16,

    /// Shared secret used to verify bearer tokens.
    pub jwt_secret: String,

    /// Base URLs of the backend services.
    pub services: ServiceEndpoints,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Circuit breaker configuration.
    pub circuit_breaker: CircuitBreakerConfig,

    /// CORS configuration.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            jwt_secret: "nexus-dev-secret-change-in-production".to_string(),
            services: ServiceEndpoints::default(),
            rate_limit: RateLimitConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            cors: CorsConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Base URLs of the backend services, one per service name.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceEndpoints {
    pub user_service: String,
    pub content_service: String,
    pub notification_service: String,
}

impl ServiceEndpoints {
    /// Base URL for the given backend.
    pub fn url_for(&self, service: ServiceName) -> &str {
        match service {
            ServiceName::User => &self.user_service,
            ServiceName::Content => &self.content_service,
            ServiceName::Notification => &self.notification_service,
        }
    }
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            user_service: "http://localhost:3001".to_string(),
            content_service: "http://localhost:3002".to_string(),
            notification_service: "http://localhost:3003".to_string(),
        }
    }
}

/// Rate limiting configuration.
///
/// The auth class covers `/api/auth` paths and is deliberately stricter;
/// the default class covers everything else.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Bucket capacity for the default class.
    pub default_max_requests: u32,

    /// Full-refill window for the default class, in milliseconds.
    pub default_window_ms: u64,

    /// Bucket capacity for the auth class.
    pub auth_max_requests: u32,

    /// Full-refill window for the auth class, in milliseconds.
    pub auth_window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            default_max_requests: 100,
            default_window_ms: 60_000,
            auth_max_requests: 10,
            auth_window_ms: 60_000,
        }
    }
}

/// Circuit breaker configuration, shared by all backend circuits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// A circuit opens once its failure count exceeds this threshold
    /// within the failure window.
    pub failure_threshold: u32,

    /// Window in which consecutive failures are counted, in milliseconds.
    pub failure_window_ms: u64,

    /// How long an open circuit rejects before probing, in milliseconds.
    pub open_duration_ms: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            failure_window_ms: 60_000,
            open_duration_ms: 30_000,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the gateway. `*` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Timeout for a single upstream call, in seconds. Expiry is treated
    /// as a backend failure.
    pub upstream_secs: u64,

    /// Total time budget for handling one inbound request, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upstream_secs: 30,
            request_secs: 60,
        }
    }
}
