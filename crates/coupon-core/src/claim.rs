//! Claim facts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CouponName, UserId};

/// A durable fact that a user has been granted one unit of a coupon.
///
/// The pair `(user_id, coupon_name)` identifies a claim; the store enforces
/// that at most one exists per pair. Claims are never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// The claiming user.
    pub user_id: UserId,
    /// The claimed coupon.
    pub coupon_name: CouponName,
    /// When the claim was recorded.
    pub claimed_at: DateTime<Utc>,
}

impl Claim {
    /// Create a claim stamped with the current time.
    #[must_use]
    pub fn new(user_id: UserId, coupon_name: CouponName) -> Self {
        Self {
            user_id,
            coupon_name,
            claimed_at: Utc::now(),
        }
    }
}
