//! Nexus API Gateway
//!
//! An API gateway built with Tokio and Axum that fronts the user, content
//! and notification services.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────┐
//!                  │                  API GATEWAY                     │
//!                  │                                                  │
//!  Client Request  │  ┌──────┐  ┌───────────┐  ┌──────┐  ┌─────────┐ │
//!  ────────────────┼─▶│ cors │─▶│request id │─▶│ rate │─▶│  auth   │ │
//!                  │  └──────┘  │ + logging │  │limit │  │  gate   │ │
//!                  │            └───────────┘  └──────┘  └────┬────┘ │
//!                  │                                          │      │
//!                  │                                          ▼      │
//!                  │  ┌─────────────┐   ┌─────────┐   ┌───────────┐  │
//!  Client Response │  │   circuit   │◀──│forwarder│◀──│  routing  │  │
//!  ◀───────────────┼──│   breaker   │──▶│ (hyper) │   │   table   │  │
//!                  │  └─────────────┘   └────┬────┘   └───────────┘  │
//!                  └───────────────────────── │ ────────────────────-┘
//!                                             ▼
//!                              user / content / notification service
//! ```

use tokio::net::TcpListener;

use nexus_gateway::config::GatewayConfig;
use nexus_gateway::http::HttpServer;
use nexus_gateway::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    tracing::info!("nexus-gateway v0.1.0 starting");

    let config = GatewayConfig::from_env();

    tracing::info!(
        port = config.port,
        user_service = %config.services.user_service,
        content_service = %config.services.content_service,
        notification_service = %config.services.notification_service,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
