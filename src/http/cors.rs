//! CORS middleware.
//!
//! Mirrors the gateway's browser contract: a configurable origin
//! allowlist (`*` permits any origin), fixed method/header allowances,
//! and the rate-limit headers exposed to scripts. Preflight requests
//! are answered directly without entering the pipeline.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::server::AppState;

const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Request-Id";
const EXPOSE_HEADERS: &str =
    "X-Request-Id, X-RateLimit-Limit, X-RateLimit-Remaining, X-RateLimit-Reset";

pub async fn cors_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let origin = request.headers().get("origin").cloned();
    let is_preflight = request.method() == Method::OPTIONS;

    let mut response = if is_preflight {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let allowed = &state.config.cors.allowed_origins;
    let headers = response.headers_mut();

    if allowed.iter().any(|o| o == "*") {
        headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    } else if let Some(origin) = origin {
        let matches = origin
            .to_str()
            .map(|o| allowed.iter().any(|a| a == o))
            .unwrap_or(false);
        if matches {
            headers.insert("access-control-allow-origin", origin);
        }
    }

    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        "access-control-expose-headers",
        HeaderValue::from_static(EXPOSE_HEADERS),
    );

    response
}
