//! Token bucket rate limiting middleware.
//!
//! Buckets refill continuously: a key that sends nothing for a full
//! window is back at capacity, with no discrete reset boundary. Auth
//! endpoints get their own, stricter bucket class so credential
//! stuffing cannot ride on the default budget.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::RateLimitConfig;
use crate::http::error::GatewayError;
use crate::http::server::AppState;

/// Which limit configuration a request falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitClass {
    Default,
    Auth,
}

impl LimitClass {
    /// Auth endpoints use the stricter class; everything else is default.
    pub fn for_path(path: &str) -> Self {
        if path == "/api/auth" || path.starts_with("/api/auth/") {
            LimitClass::Auth
        } else {
            LimitClass::Default
        }
    }
}

/// Capacity and refill window of one limit class.
#[derive(Debug, Clone, Copy)]
struct ClassLimits {
    max_tokens: u32,
    window_ms: u64,
}

/// A continuously refilled token bucket.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BucketKey {
    class: LimitClass,
    client: String,
}

/// Outcome of one admission check, with everything the middleware needs
/// to write the rate-limit response headers.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub admitted: bool,
    /// The class's bucket capacity.
    pub limit: u32,
    /// Whole tokens left after this request, clamped at zero.
    pub remaining: u32,
    /// Milliseconds until the bucket is back at capacity.
    pub reset_ms: u64,
    /// Seconds until at least one token is available; set on rejection.
    pub retry_after_secs: Option<u64>,
}

/// Per-key token bucket admission control.
///
/// Buckets are created lazily and live for the process lifetime. The
/// map is the only shared state; refill-then-decrement happens under
/// the lock, so concurrent requests on one key cannot double-spend.
pub struct RateLimiter {
    buckets: Mutex<HashMap<BucketKey, TokenBucket>>,
    default_class: ClassLimits,
    auth_class: ClassLimits,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            default_class: ClassLimits {
                max_tokens: config.default_max_requests,
                window_ms: config.default_window_ms,
            },
            auth_class: ClassLimits {
                max_tokens: config.auth_max_requests,
                window_ms: config.auth_window_ms,
            },
        }
    }

    /// Admit or reject one request for `client` under `class`.
    pub fn check(&self, class: LimitClass, client: &str) -> RateLimitDecision {
        self.check_at(class, client, Instant::now())
    }

    pub fn check_at(&self, class: LimitClass, client: &str, now: Instant) -> RateLimitDecision {
        let limits = match class {
            LimitClass::Default => self.default_class,
            LimitClass::Auth => self.auth_class,
        };
        let max = f64::from(limits.max_tokens);
        let window_ms = limits.window_ms as f64;

        let mut buckets = self.buckets.lock().expect("rate limiter mutex poisoned");
        let bucket = buckets
            .entry(BucketKey { class, client: client.to_string() })
            .or_insert_with(|| TokenBucket { tokens: max, last_refill: now });

        // Continuous refill based on elapsed time.
        let elapsed_ms = now.duration_since(bucket.last_refill).as_millis() as f64;
        bucket.tokens = (bucket.tokens + elapsed_ms / window_ms * max).min(max);
        bucket.last_refill = now;

        let remaining = (bucket.tokens.floor() as i64 - 1).max(0) as u32;
        let reset_ms = ((max - bucket.tokens) / max * window_ms).ceil() as u64;

        if bucket.tokens < 1.0 {
            let retry_after_secs = ((1.0 - bucket.tokens) / max * window_ms / 1000.0).ceil() as u64;
            return RateLimitDecision {
                admitted: false,
                limit: limits.max_tokens,
                remaining,
                reset_ms,
                retry_after_secs: Some(retry_after_secs),
            };
        }

        bucket.tokens -= 1.0;
        RateLimitDecision {
            admitted: true,
            limit: limits.max_tokens,
            remaining,
            reset_ms,
            retry_after_secs: None,
        }
    }
}

/// Client key: first `X-Forwarded-For` entry, then peer address, then a
/// literal "unknown".
fn client_key(request: &Request<Body>, peer: Option<SocketAddr>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Unix-second timestamp at which the bucket is back at capacity.
fn reset_unix_secs(reset_ms: u64) -> u64 {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    (now_ms + reset_ms).div_ceil(1000)
}

/// Middleware applying the token bucket check to every request except
/// the health endpoint.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if path == "/health" {
        return next.run(request).await;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let class = LimitClass::for_path(path);
    let client = client_key(&request, peer);
    let decision = state.limiter.check(class, &client);

    let mut response = if decision.admitted {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, class = ?class, "Rate limit exceeded");
        let mut response = GatewayError::TooManyRequests.into_response();
        if let Some(secs) = decision.retry_after_secs {
            response
                .headers_mut()
                .insert("retry-after", HeaderValue::from(secs));
        }
        response
    };

    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert(
        "x-ratelimit-reset",
        HeaderValue::from(reset_unix_secs(decision.reset_ms)),
    );
    response
}
