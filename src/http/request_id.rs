//! Correlation id assignment and request logging.
//!
//! A caller-supplied `X-Request-Id` is reused verbatim; otherwise a
//! fresh UUID is generated. The chosen id is written back onto the
//! request (so the forwarder propagates it downstream) and echoed on
//! the response. This stage never rejects a request.

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

const X_REQUEST_ID: &str = "x-request-id";

/// Take the inbound id when present and non-empty, generate otherwise.
fn correlation_id(request: &Request<Body>) -> HeaderValue {
    request
        .headers()
        .get(X_REQUEST_ID)
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        })
}

/// Middleware tagging every request with a correlation id and logging
/// its completion.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let id = correlation_id(&request);
    request.headers_mut().insert(X_REQUEST_ID, id.clone());

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let mut response = next.run(request).await;
    response.headers_mut().insert(X_REQUEST_ID, id.clone());

    tracing::info!(
        request_id = %id.to_str().unwrap_or("-"),
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    response
}
