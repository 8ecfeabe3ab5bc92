//! Coupon supply records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CouponName, UserId};

/// A named promotional offer with a fixed total claim limit.
///
/// `remaining_count` starts at `total_limit` and only ever moves down, one
/// unit per accepted claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Unique coupon name.
    pub name: CouponName,
    /// Total number of claims ever allowed.
    pub total_limit: i64,
    /// Claims still available.
    pub remaining_count: i64,
    /// When the coupon was created.
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// Create a fresh coupon with its full supply available.
    #[must_use]
    pub fn new(name: CouponName, total_limit: i64) -> Self {
        Self {
            name,
            total_limit,
            remaining_count: total_limit,
            created_at: Utc::now(),
        }
    }

    /// Number of claims granted so far.
    #[must_use]
    pub fn claimed_count(&self) -> i64 {
        self.total_limit - self.remaining_count
    }
}

/// A coupon together with every user holding a committed claim on it.
///
/// The claimant list is read independently of the coupon row, so it may lag
/// claims that commit while the view is being assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponView {
    /// The coupon's supply state.
    pub coupon: Coupon,
    /// Users with a committed claim.
    pub claimed_by: Vec<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_coupon_has_full_supply() {
        let coupon = Coupon::new(CouponName::new("D100").unwrap(), 100);
        assert_eq!(coupon.remaining_count, 100);
        assert_eq!(coupon.claimed_count(), 0);
    }

    #[test]
    fn claimed_count_tracks_supply() {
        let mut coupon = Coupon::new(CouponName::new("FLASH5").unwrap(), 5);
        coupon.remaining_count = 0;
        assert_eq!(coupon.claimed_count(), 5);
    }
}
