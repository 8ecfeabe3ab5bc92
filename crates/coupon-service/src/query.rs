//! Read-only coupon views.

use std::sync::Arc;

use coupon_core::{CouponError, CouponName, CouponView, Result};
use coupon_store::Store;

use crate::registry::CouponRegistry;

/// Assembles a coupon together with its claimants.
#[derive(Clone)]
pub struct QueryService {
    registry: CouponRegistry,
    store: Arc<dyn Store>,
}

impl QueryService {
    /// Create a query service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            registry: CouponRegistry::new(Arc::clone(&store)),
            store,
        }
    }

    /// Describe a coupon and every user holding a claim on it.
    ///
    /// The coupon row and the claimant list are two independent reads. A
    /// claim committing between them can show up in one and not the other.
    ///
    /// # Errors
    ///
    /// - `CouponError::NotFound` if no coupon has this name.
    /// - `CouponError::Transient` if the store fails.
    pub async fn describe(&self, name: &CouponName) -> Result<CouponView> {
        let coupon = self.registry.get(name).await?;

        let claimed_by = self.store.list_claimants(name).await.map_err(|e| {
            tracing::warn!(coupon = %name, error = %e, "Failed to list claimants");
            CouponError::Transient(e.to_string())
        })?;

        Ok(CouponView { coupon, claimed_by })
    }
}
