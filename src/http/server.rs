//! HTTP server setup and pipeline composition.
//!
//! # Responsibilities
//! - Create the Axum router with the health and forwarding handlers
//! - Wire the middleware chain in its fixed order:
//!   trace → timeout → panic catcher → CORS → correlation id →
//!   rate limit → auth → handler
//! - Own the shared state (limiter, circuits, upstream client)
//! - Bind the server to a listener and serve until shutdown

use std::any::Any;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::http::cors::cors_middleware;
use crate::http::error::GatewayError;
use crate::http::health::health_handler;
use crate::http::request_id::request_id_middleware;
use crate::proxy::forwarder::{forward_handler, UpstreamTarget, UpstreamUrlError};
use crate::resilience::CircuitBreakerRegistry;
use crate::routing::{RouteTable, ServiceName};
use crate::security::auth::auth_middleware;
use crate::security::rate_limit::rate_limit_middleware;
use crate::security::RateLimiter;

/// Configuration problems that prevent the server from starting.
#[derive(Debug, Error)]
#[error("invalid base url for {service}: {source}")]
pub struct ServerInitError {
    pub service: ServiceName,
    #[source]
    pub source: UpstreamUrlError,
}

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub routes: Arc<RouteTable>,
    pub targets: Arc<HashMap<ServiceName, UpstreamTarget>>,
    pub limiter: Arc<RateLimiter>,
    pub circuits: Arc<CircuitBreakerRegistry>,
    pub client: Client<HttpConnector, Body>,
    pub upstream_timeout: Duration,
    pub started_at: Instant,
}

/// HTTP server for the API gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerInitError> {
        let mut targets = HashMap::new();
        for service in ServiceName::ALL {
            let url = config.services.url_for(service);
            let target = UpstreamTarget::parse(url)
                .map_err(|source| ServerInitError { service, source })?;
            targets.insert(service, target);
        }

        let upstream_timeout = Duration::from_secs(config.timeouts.upstream_secs);
        let request_timeout = Duration::from_secs(config.timeouts.request_secs);

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(upstream_timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = AppState {
            routes: Arc::new(RouteTable::nexus_default()),
            targets: Arc::new(targets),
            limiter: Arc::new(RateLimiter::new(&config.rate_limit)),
            circuits: Arc::new(CircuitBreakerRegistry::new(&config.circuit_breaker)),
            client,
            upstream_timeout,
            started_at: Instant::now(),
            config: Arc::new(config),
        };

        Ok(Self {
            router: Self::build_router(request_timeout, state),
        })
    }

    /// Build the Axum router with the full middleware chain.
    fn build_router(request_timeout: Duration, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/", any(forward_handler))
            .route("/{*path}", any(forward_handler))
            .with_state(state.clone())
            .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
            .layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
            .layer(middleware::from_fn(request_id_middleware))
            .layer(middleware::from_fn_with_state(state, cors_middleware))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Terminal fault handler: log the fault, answer with the opaque
/// internal error envelope.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Unhandled fault in request pipeline");
    GatewayError::Internal.into_response()
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
