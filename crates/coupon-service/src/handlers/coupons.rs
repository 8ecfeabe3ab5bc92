//! Coupon handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use coupon_core::{Claim, ClaimCoupon, Coupon, CouponName, CouponView, CreateCoupon};

use crate::error::ApiError;
use crate::state::AppState;

/// Create coupon request.
///
/// Fields are optional here so that a missing field reports the same
/// `invalid_input` error as a malformed one.
#[derive(Debug, Deserialize)]
pub struct CreateCouponRequest {
    /// Coupon name.
    pub name: Option<String>,
    /// Total number of claims allowed.
    pub amount: Option<i64>,
}

/// Coupon supply state.
#[derive(Debug, Serialize)]
pub struct CouponResponse {
    /// Coupon name.
    pub name: String,
    /// Total number of claims allowed.
    pub amount: i64,
    /// Claims still available.
    pub remaining_amount: i64,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&Coupon> for CouponResponse {
    fn from(coupon: &Coupon) -> Self {
        Self {
            name: coupon.name.to_string(),
            amount: coupon.total_limit,
            remaining_amount: coupon.remaining_count,
            created_at: coupon.created_at.to_rfc3339(),
        }
    }
}

/// Create coupon response.
#[derive(Debug, Serialize)]
pub struct CreateCouponResponse {
    /// Human-readable result.
    pub message: String,
    /// The created coupon.
    pub coupon: CouponResponse,
}

/// Create a coupon.
pub async fn create_coupon(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateCouponRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateCouponResponse>), ApiError> {
    let Json(body) = body?;
    let request = CreateCoupon::new(body.name.as_deref(), body.amount)?;

    let coupon = state.registry.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCouponResponse {
            message: "Coupon created successfully!".to_string(),
            coupon: CouponResponse::from(&coupon),
        }),
    ))
}

/// Claim request.
#[derive(Debug, Deserialize)]
pub struct ClaimCouponRequest {
    /// The claiming user.
    pub user_id: Option<String>,
    /// The coupon to claim.
    pub coupon_name: Option<String>,
}

/// A recorded claim.
#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    /// The claiming user.
    pub user_id: String,
    /// The claimed coupon.
    pub coupon_name: String,
    /// Claim timestamp.
    pub claimed_at: String,
}

impl From<&Claim> for ClaimResponse {
    fn from(claim: &Claim) -> Self {
        Self {
            user_id: claim.user_id.to_string(),
            coupon_name: claim.coupon_name.to_string(),
            claimed_at: claim.claimed_at.to_rfc3339(),
        }
    }
}

/// Claim coupon response.
#[derive(Debug, Serialize)]
pub struct ClaimCouponResponse {
    /// Human-readable result.
    pub message: String,
    /// The recorded claim.
    pub claim: ClaimResponse,
}

/// Claim one unit of a coupon for a user.
pub async fn claim_coupon(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ClaimCouponRequest>, JsonRejection>,
) -> Result<Json<ClaimCouponResponse>, ApiError> {
    let Json(body) = body?;
    let request = ClaimCoupon::new(body.user_id.as_deref(), body.coupon_name.as_deref())?;

    let claim = state.claims.claim(request).await?;

    Ok(Json(ClaimCouponResponse {
        message: "Coupon claimed successfully!".to_string(),
        claim: ClaimResponse::from(&claim),
    }))
}

/// Coupon detail response.
#[derive(Debug, Serialize)]
pub struct CouponDetailResponse {
    /// Coupon name.
    pub name: String,
    /// Total number of claims allowed.
    pub amount: i64,
    /// Claims still available.
    pub remaining_amount: i64,
    /// Users holding a claim.
    pub claimed_by: Vec<String>,
}

impl From<CouponView> for CouponDetailResponse {
    fn from(view: CouponView) -> Self {
        Self {
            name: view.coupon.name.to_string(),
            amount: view.coupon.total_limit,
            remaining_amount: view.coupon.remaining_count,
            claimed_by: view.claimed_by.into_iter().map(String::from).collect(),
        }
    }
}

/// Describe a coupon and its claimants.
pub async fn describe_coupon(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<CouponDetailResponse>, ApiError> {
    // A name that fails validation can never have been created.
    let name = CouponName::new(&name)
        .map_err(|_| ApiError::NotFound(format!("Coupon not found: {name}")))?;

    let view = state.query.describe(&name).await?;

    Ok(Json(CouponDetailResponse::from(view)))
}
