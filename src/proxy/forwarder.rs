//! Request forwarding with circuit breaker reporting.

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        HeaderMap, HeaderValue, Request, Uri,
    },
    response::{IntoResponse, Response},
};
use thiserror::Error;
use url::Url;

use crate::http::error::GatewayError;
use crate::http::server::AppState;
use crate::resilience::CircuitState;
use crate::routing::Route;

/// Hop-by-hop headers are meaningful per connection only and must not
/// be relayed in either direction.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

#[derive(Debug, Error)]
pub enum UpstreamUrlError {
    #[error("invalid url: {0}")]
    Parse(#[from] url::ParseError),

    #[error("unsupported scheme {0:?}, only http upstreams are supported")]
    Scheme(String),

    #[error("url has no host")]
    MissingHost,

    #[error("invalid authority: {0}")]
    Authority(#[from] axum::http::uri::InvalidUri),
}

/// A backend base address, parsed once at startup.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    scheme: Scheme,
    authority: Authority,
}

impl UpstreamTarget {
    pub fn parse(base_url: &str) -> Result<Self, UpstreamUrlError> {
        let parsed = Url::parse(base_url)?;
        if parsed.scheme() != "http" {
            return Err(UpstreamUrlError::Scheme(parsed.scheme().to_string()));
        }
        let host = parsed.host_str().ok_or(UpstreamUrlError::MissingHost)?;
        let authority = match parsed.port() {
            Some(port) => Authority::try_from(format!("{host}:{port}").as_str())?,
            None => Authority::try_from(host)?,
        };
        Ok(Self {
            scheme: Scheme::HTTP,
            authority,
        })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }
}

/// Rebase an admitted request onto its backend: rewritten path, backend
/// authority, hop-by-hop headers stripped, Host set to the backend.
fn build_upstream_request(
    target: &UpstreamTarget,
    route: &Route,
    request: Request<Body>,
) -> Result<Request<Body>, axum::http::Error> {
    let (mut parts, body) = request.into_parts();

    let rewritten = route.rewrite_path(parts.uri.path());
    let path_and_query = match parts.uri.query() {
        Some(query) => format!("{rewritten}?{query}"),
        None => rewritten,
    };

    parts.uri = Uri::builder()
        .scheme(target.scheme.clone())
        .authority(target.authority.clone())
        .path_and_query(PathAndQuery::try_from(path_and_query.as_str())?)
        .build()?;

    strip_hop_by_hop(&mut parts.headers);
    if let Ok(host) = HeaderValue::from_str(target.authority.as_str()) {
        parts.headers.insert("host", host);
    }

    Ok(Request::from_parts(parts, body))
}

/// Terminal handler: resolve the route, consult the circuit breaker,
/// forward, relay, and report the outcome.
pub async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let Some(route) = state.routes.resolve(request.uri().path()) else {
        return GatewayError::NotFound.into_response();
    };
    let service = route.service;

    if state.circuits.state(service) == CircuitState::Open {
        tracing::warn!(service = %service, "Circuit open, rejecting without forwarding");
        return GatewayError::ServiceUnavailable(service).into_response();
    }

    let target = &state.targets[&service];
    let upstream_request = match build_upstream_request(target, route, request) {
        Ok(req) => req,
        Err(err) => {
            tracing::error!(service = %service, error = %err, "Failed to build upstream request");
            return GatewayError::Internal.into_response();
        }
    };

    match tokio::time::timeout(state.upstream_timeout, state.client.request(upstream_request)).await
    {
        Ok(Ok(response)) => {
            // Any response counts as success; the backend is reachable.
            state.circuits.record_success(service);
            let (parts, body) = response.into_parts();
            let mut response = Response::from_parts(parts, Body::new(body));
            strip_hop_by_hop(response.headers_mut());
            response
        }
        Ok(Err(err)) => {
            tracing::error!(service = %service, error = %err, "Upstream request failed");
            state.circuits.record_failure(service);
            GatewayError::BadGateway(service).into_response()
        }
        Err(_) => {
            tracing::error!(
                service = %service,
                timeout_secs = state.upstream_timeout.as_secs(),
                "Upstream request timed out"
            );
            state.circuits.record_failure(service);
            GatewayError::BadGateway(service).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{RouteTable, ServiceName};

    #[test]
    fn parses_host_and_port() {
        let target = UpstreamTarget::parse("http://localhost:3001").unwrap();
        assert_eq!(target.authority().as_str(), "localhost:3001");
    }

    #[test]
    fn parses_host_without_port() {
        let target = UpstreamTarget::parse("http://user-service").unwrap();
        assert_eq!(target.authority().as_str(), "user-service");
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(matches!(
            UpstreamTarget::parse("https://localhost:3001"),
            Err(UpstreamUrlError::Scheme(_))
        ));
        assert!(UpstreamTarget::parse("not a url").is_err());
    }

    #[test]
    fn rebases_request_onto_backend() {
        let target = UpstreamTarget::parse("http://localhost:3002").unwrap();
        let table = RouteTable::nexus_default();
        let route = table.resolve("/api/tasks/7").unwrap();
        assert_eq!(route.service, ServiceName::Content);

        let request = Request::builder()
            .uri("/api/tasks/7?page=2")
            .header("connection", "keep-alive")
            .header("x-request-id", "rid-1")
            .body(Body::empty())
            .unwrap();

        let upstream = build_upstream_request(&target, route, request).unwrap();
        assert_eq!(upstream.uri().to_string(), "http://localhost:3002/tasks/7?page=2");
        assert_eq!(upstream.headers().get("host").unwrap(), "localhost:3002");
        assert_eq!(upstream.headers().get("x-request-id").unwrap(), "rid-1");
        assert!(upstream.headers().get("connection").is_none());
    }
}
