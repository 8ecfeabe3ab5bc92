//! Coupon claim HTTP API service.
//!
//! This crate provides the coupon components and their HTTP surface:
//!
//! - [`CouponRegistry`]: coupon creation and lookup
//! - [`ClaimProtocol`]: atomic claim admission
//! - [`QueryService`]: coupon details with claimants
//!
//! # Guarantees
//!
//! Under any number of concurrent requests, a coupon never grants more claims
//! than its limit and a user claims a given coupon at most once. Both rest on
//! the database: a primary key on claims and a conditional decrement on
//! coupons. The service itself holds no locks and never retries.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result

pub mod claims;
pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod registry;
pub mod routes;
pub mod state;

pub use claims::ClaimProtocol;
pub use config::ServiceConfig;
pub use error::ApiError;
pub use query::QueryService;
pub use registry::CouponRegistry;
pub use routes::create_router;
pub use state::AppState;
