//! Validated per-operation inputs.
//!
//! Wire payloads are loosely typed; these structs only exist once every field
//! has passed its presence and range checks, so nothing downstream re-validates.

use serde::Serialize;

use crate::error::{CouponError, Result};
use crate::ids::{CouponName, UserId};

/// A validated request to create a coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCoupon {
    /// Name of the new coupon.
    pub name: CouponName,
    /// Total number of claims allowed. Always positive.
    pub total_limit: i64,
}

impl CreateCoupon {
    /// Validate raw create-coupon fields.
    ///
    /// # Errors
    ///
    /// Returns `CouponError::InvalidInput` if a field is missing, the name is
    /// malformed, or the limit is not a positive integer.
    pub fn new(name: Option<&str>, total_limit: Option<i64>) -> Result<Self> {
        let name = name.ok_or_else(|| CouponError::InvalidInput("name is required".into()))?;
        let total_limit = total_limit
            .ok_or_else(|| CouponError::InvalidInput("amount is required".into()))?;

        if total_limit <= 0 {
            return Err(CouponError::InvalidInput(format!(
                "amount must be a positive integer, got {total_limit}"
            )));
        }

        Ok(Self {
            name: CouponName::new(name)?,
            total_limit,
        })
    }
}

/// A validated request to claim a coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimCoupon {
    /// The claiming user.
    pub user_id: UserId,
    /// The coupon being claimed.
    pub coupon_name: CouponName,
}

impl ClaimCoupon {
    /// Validate raw claim fields.
    ///
    /// # Errors
    ///
    /// Returns `CouponError::InvalidInput` if either field is missing or malformed.
    pub fn new(user_id: Option<&str>, coupon_name: Option<&str>) -> Result<Self> {
        let user_id =
            user_id.ok_or_else(|| CouponError::InvalidInput("user_id is required".into()))?;
        let coupon_name = coupon_name
            .ok_or_else(|| CouponError::InvalidInput("coupon_name is required".into()))?;

        Ok(Self {
            user_id: UserId::new(user_id)?,
            coupon_name: CouponName::new(coupon_name)?,
        })
    }
}
