//! API error types and responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use coupon_core::CouponError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request body or parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Coupon name already taken.
    #[error("duplicate coupon: {0}")]
    DuplicateCoupon(String),

    /// User already claimed this coupon.
    #[error("already claimed: {0}")]
    AlreadyClaimed(String),

    /// Coupon sold out or never created.
    #[error("sold out or unknown coupon: {0}")]
    SoldOutOrUnknownCoupon(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Store unavailable; the request may be retried.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_input",
                msg.clone(),
                None,
            ),
            Self::DuplicateCoupon(name) => (
                StatusCode::CONFLICT,
                "duplicate_coupon",
                format!("Coupon {name} already exists"),
                None,
            ),
            Self::AlreadyClaimed(_) => (
                StatusCode::CONFLICT,
                "already_claimed",
                "You have already claimed this coupon".to_string(),
                None,
            ),
            Self::SoldOutOrUnknownCoupon(_) => (
                StatusCode::BAD_REQUEST,
                "sold_out_or_unknown",
                "Coupon sold out or does not exist".to_string(),
                None,
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::Unavailable(msg) => {
                tracing::warn!(error = %msg, "Service temporarily unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "transient_failure",
                    "Temporary failure, please retry".to_string(),
                    Some(serde_json::json!({ "retryable": true })),
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<CouponError> for ApiError {
    fn from(err: CouponError) -> Self {
        match err {
            CouponError::InvalidInput(msg) => Self::InvalidInput(msg),
            CouponError::DuplicateCoupon { name } => Self::DuplicateCoupon(name),
            CouponError::AlreadyClaimed {
                user_id,
                coupon_name,
            } => Self::AlreadyClaimed(format!("{user_id} -> {coupon_name}")),
            CouponError::SoldOutOrUnknownCoupon { coupon_name } => {
                Self::SoldOutOrUnknownCoupon(coupon_name)
            }
            CouponError::NotFound { name } => Self::NotFound(format!("Coupon not found: {name}")),
            CouponError::Transient(msg) => Self::Unavailable(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}
