//! Health check endpoints
//!
//! - /health - Liveness probe (the process is serving requests)
//! - /ready - Readiness probe (the document store answers a ping)

use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::warn;

use super::response::{json_response, BoxBody};
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
    pub version: &'static str,
    /// Operating mode
    pub mode: &'static str,
    /// Document store backend
    pub storage: &'static str,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn build_health_response(state: &AppState, status: &'static str) -> HealthResponse {
    HealthResponse {
        success: status == "ok",
        status,
        version: env!("CARGO_PKG_VERSION"),
        mode: if state.args.dev_mode {
            "development"
        } else {
            "production"
        },
        storage: state.store.backend(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        message: None,
    }
}

/// Handle liveness probe (/health)
pub fn health_check(state: &AppState) -> Response<BoxBody> {
    json_response(StatusCode::OK, &build_health_response(state, "ok"))
}

/// Handle readiness probe (/ready). 503 while storage is unreachable.
pub async fn readiness_check(state: &AppState) -> Response<BoxBody> {
    match state.store.ping().await {
        Ok(()) => json_response(StatusCode::OK, &build_health_response(state, "ok")),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            let mut response = build_health_response(state, "unavailable");
            response.message = Some(e.public_message());
            json_response(StatusCode::SERVICE_UNAVAILABLE, &response)
        }
    }
}
