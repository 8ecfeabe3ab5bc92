//! Coupon registry: creates coupons and reads their supply state.

use std::sync::Arc;

use coupon_core::{Coupon, CouponError, CouponName, CreateCoupon, Result};
use coupon_store::{Store, StoreError};

/// Creates and reads coupon supply records.
#[derive(Clone)]
pub struct CouponRegistry {
    store: Arc<dyn Store>,
}

impl CouponRegistry {
    /// Create a registry over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a coupon with its full supply available.
    ///
    /// # Errors
    ///
    /// - `CouponError::DuplicateCoupon` if the name is taken; the existing
    ///   coupon is left untouched.
    /// - `CouponError::Transient` if the store fails.
    pub async fn create(&self, request: CreateCoupon) -> Result<Coupon> {
        let coupon = Coupon::new(request.name, request.total_limit);

        match self.store.insert_coupon(&coupon).await {
            Ok(()) => {
                tracing::info!(
                    coupon = %coupon.name,
                    total_limit = coupon.total_limit,
                    "Coupon created"
                );
                Ok(coupon)
            }
            Err(StoreError::UniqueViolation { .. }) => {
                tracing::debug!(coupon = %coupon.name, "Coupon already exists");
                Err(CouponError::DuplicateCoupon {
                    name: coupon.name.to_string(),
                })
            }
            Err(e) => {
                tracing::warn!(coupon = %coupon.name, error = %e, "Failed to create coupon");
                Err(CouponError::Transient(e.to_string()))
            }
        }
    }

    /// Get a coupon's current supply state.
    ///
    /// # Errors
    ///
    /// - `CouponError::NotFound` if no coupon has this name.
    /// - `CouponError::Transient` if the store fails.
    pub async fn get(&self, name: &CouponName) -> Result<Coupon> {
        self.store
            .get_coupon(name)
            .await
            .map_err(|e| {
                tracing::warn!(coupon = %name, error = %e, "Failed to read coupon");
                CouponError::Transient(e.to_string())
            })?
            .ok_or_else(|| CouponError::NotFound {
                name: name.to_string(),
            })
    }
}
