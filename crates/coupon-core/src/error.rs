//! Error types for the coupon claim service.
//!
//! Every failure surfaces as exactly one of these kinds. Business rejections
//! (`DuplicateCoupon`, `AlreadyClaimed`, `NotFound`, `SoldOutOrUnknownCoupon`)
//! are terminal; only `Transient` is safe to retry.

use crate::ids::IdError;

/// Result type for coupon operations.
pub type Result<T> = std::result::Result<T, CouponError>;

/// Errors that can occur in coupon operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CouponError {
    /// Malformed request, rejected before touching the store.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A coupon with this name already exists.
    #[error("coupon already exists: {name}")]
    DuplicateCoupon {
        /// The conflicting coupon name.
        name: String,
    },

    /// The user already holds a claim on this coupon.
    #[error("coupon {coupon_name} already claimed by {user_id}")]
    AlreadyClaimed {
        /// The claiming user.
        user_id: String,
        /// The coupon.
        coupon_name: String,
    },

    /// The coupon has no remaining supply, or was never created.
    ///
    /// The two cases are deliberately indistinguishable so that claim
    /// responses cannot be used to enumerate coupon names.
    #[error("coupon sold out or does not exist: {coupon_name}")]
    SoldOutOrUnknownCoupon {
        /// The coupon.
        coupon_name: String,
    },

    /// Coupon not found.
    #[error("coupon not found: {name}")]
    NotFound {
        /// The coupon name that was not found.
        name: String,
    },

    /// Store unavailability, lock timeout, connection error.
    #[error("transient failure: {0}")]
    Transient(String),
}

impl CouponError {
    /// Whether the caller may retry the same request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<IdError> for CouponError {
    fn from(err: IdError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_is_retryable() {
        assert!(CouponError::Transient("pool timed out".into()).is_retryable());
        assert!(!CouponError::AlreadyClaimed {
            user_id: "u1".into(),
            coupon_name: "X".into(),
        }
        .is_retryable());
        assert!(!CouponError::SoldOutOrUnknownCoupon {
            coupon_name: "X".into()
        }
        .is_retryable());
        assert!(!CouponError::InvalidInput("bad".into()).is_retryable());
    }

    #[test]
    fn id_errors_become_invalid_input() {
        let err: CouponError = IdError::Empty { field: "user id" }.into();
        assert_eq!(err, CouponError::InvalidInput("user id must not be empty".into()));
    }
}
