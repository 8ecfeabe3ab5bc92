//! Health check handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Database backend and reachability.
    pub database: DatabaseHealth,
}

/// Database section of the health response.
#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    /// Backend name.
    pub backend: String,
    /// Whether the database answered a ping.
    pub reachable: bool,
}

/// Health check endpoint.
///
/// Responds 503 when the database cannot be reached.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let reachable = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach database");
            false
        }
    };

    let status = if reachable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if reachable { "ok" } else { "degraded" }.to_string(),
            service: "coupon-service".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: DatabaseHealth {
                backend: state.store.backend().to_string(),
                reachable,
            },
        }),
    )
}
