//! Coupon Client SDK.
//!
//! Typed access to the coupon service HTTP API.
//!
//! # Example
//!
//! ```no_run
//! use coupon_client::{ClientError, CouponClient};
//!
//! # async fn example() -> Result<(), ClientError> {
//! let client = CouponClient::new("http://coupons.internal:8080")?;
//!
//! client.create_coupon("FLASH_SALE_5", 5).await?;
//!
//! match client.claim_coupon("user_42", "FLASH_SALE_5").await {
//!     Ok(claim) => println!("claimed at {}", claim.claimed_at),
//!     Err(ClientError::AlreadyClaimed { .. }) => println!("already have one"),
//!     Err(ClientError::SoldOutOrUnknownCoupon { .. }) => println!("too late"),
//!     Err(e) if e.is_retryable() => println!("try again: {e}"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, CouponClient};
pub use error::ClientError;
pub use types::*;
