//! Shared utilities for integration testing.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::{extract::Request, routing::any, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use nexus_gateway::config::GatewayConfig;
use nexus_gateway::http::HttpServer;

/// Start the gateway on an ephemeral port and return its address.
///
/// The listener is bound before the task is spawned, so callers can
/// connect immediately.
pub async fn start_gateway(config: GatewayConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).expect("gateway config should be valid");
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    addr
}

async fn echo(request: Request) -> Json<Value> {
    let headers: BTreeMap<String, String> = request
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or("").to_string(),
            )
        })
        .collect();
    Json(json!({
        "method": request.method().as_str(),
        "path": request.uri().path(),
        "query": request.uri().query(),
        "headers": headers,
    }))
}

/// Start a mock backend that echoes the request it received as JSON.
#[allow(dead_code)]
pub async fn start_echo_backend() -> SocketAddr {
    let app = Router::new()
        .route("/", any(echo))
        .route("/{*path}", any(echo));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Reserve a port nothing listens on, for connection-refused scenarios.
#[allow(dead_code)]
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
