//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{coupons, health};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check (503 when the database is unreachable)
///
/// ## Coupons (concurrency-limited)
/// - `POST /api/coupons` - Create a coupon
/// - `POST /api/coupons/claim` - Claim a coupon for a user
/// - `GET /api/coupons/:name` - Coupon details and claimants
pub fn create_router(state: AppState) -> Router {
    let config = &state.config;
    let cors = cors_layer(&config.cors_origins);
    let body_limit = RequestBodyLimitLayer::new(config.max_body_bytes);
    let timeout = TimeoutLayer::new(Duration::from_secs(config.request_timeout_seconds));
    let api_limit = ConcurrencyLimitLayer::new(config.api_max_concurrent_requests);

    let coupon_routes = Router::new()
        .route("/coupons", post(coupons::create_coupon))
        .route("/coupons/claim", post(coupons::claim_coupon))
        .route("/coupons/:name", get(coupons::describe_coupon))
        .layer(api_limit);

    // Health stays reachable when the API is saturated.
    Router::new()
        .route("/health", get(health::health))
        .nest("/api", coupon_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(body_limit)
        .layer(timeout)
        .with_state(Arc::new(state))
}

/// CORS for the configured origins; `*` allows any origin.
///
/// Only the methods and headers the coupon API uses are allowed.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(allowed)
}
