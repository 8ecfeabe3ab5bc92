//! Core types and utilities for the coupon claim service.
//!
//! This crate provides the foundational types used throughout the service:
//!
//! - **Identifiers**: `CouponName`, `UserId`
//! - **Coupons**: `Coupon`, `CouponView`
//! - **Claims**: `Claim`
//! - **Requests**: `CreateCoupon`, `ClaimCoupon` (validated before any store call)
//! - **Errors**: `CouponError`, the outcome taxonomy shared by every component
//!
//! # Invariants
//!
//! For every coupon, `0 <= remaining_count <= total_limit` and the number of
//! committed claims equals `total_limit - remaining_count`. A user holds at
//! most one claim per coupon.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod claim;
pub mod coupon;
pub mod error;
pub mod ids;
pub mod request;

pub use claim::Claim;
pub use coupon::{Coupon, CouponView};
pub use error::{CouponError, Result};
pub use ids::{CouponName, IdError, UserId, MAX_COUPON_NAME_LEN, MAX_USER_ID_LEN};
pub use request::{ClaimCoupon, CreateCoupon};
