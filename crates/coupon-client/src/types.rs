//! Request and response types for the coupon client.

use serde::{Deserialize, Serialize};

/// Create coupon request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCouponRequest {
    /// Coupon name.
    pub name: String,
    /// Total number of claims allowed.
    pub amount: i64,
}

/// Coupon supply state.
#[derive(Debug, Clone, Deserialize)]
pub struct CouponSummary {
    /// Coupon name.
    pub name: String,
    /// Total number of claims allowed.
    pub amount: i64,
    /// Claims still available.
    pub remaining_amount: i64,
    /// Created timestamp (RFC 3339).
    pub created_at: String,
}

/// Create coupon response.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCouponResponse {
    /// Human-readable result.
    pub message: String,
    /// The created coupon.
    pub coupon: CouponSummary,
}

/// Claim coupon request.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimCouponRequest {
    /// The claiming user.
    pub user_id: String,
    /// The coupon to claim.
    pub coupon_name: String,
}

/// A recorded claim.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimRecord {
    /// The claiming user.
    pub user_id: String,
    /// The claimed coupon.
    pub coupon_name: String,
    /// Claim timestamp (RFC 3339).
    pub claimed_at: String,
}

/// Claim coupon response.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimCouponResponse {
    /// Human-readable result.
    pub message: String,
    /// The recorded claim.
    pub claim: ClaimRecord,
}

/// Coupon detail with its claimants.
#[derive(Debug, Clone, Deserialize)]
pub struct CouponDetail {
    /// Coupon name.
    pub name: String,
    /// Total number of claims allowed.
    pub amount: i64,
    /// Claims still available.
    pub remaining_amount: i64,
    /// Users holding a claim.
    pub claimed_by: Vec<String>,
}

/// Service health.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Database backend and reachability.
    pub database: DatabaseHealth,
}

/// Database section of the health response.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseHealth {
    /// Backend name.
    pub backend: String,
    /// Whether the database answered a ping.
    pub reachable: bool,
}

impl HealthResponse {
    /// Whether the service reported itself healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "ok" && self.database.reachable
    }
}

/// API error response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// API error body.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: String,
    pub message: String,
}
