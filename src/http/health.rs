//! Gateway health endpoint.
//!
//! Answers locally, bypassing rate limiting and authentication, so
//! orchestrators can probe the gateway even when backends are down.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    status: &'static str,
    service: &'static str,
    timestamp: String,
    uptime: f64,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        service: "api-gateway",
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}
