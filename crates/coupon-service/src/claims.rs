//! Claim transaction protocol.
//!
//! A claim is admitted or rejected by one unit of work against the store:
//!
//! 1. `BEGIN`
//! 2. insert the `(user_id, coupon_name)` claim row; a uniqueness violation
//!    means the user already holds a claim
//! 3. `UPDATE coupons SET remaining_count = remaining_count - 1
//!    WHERE name = ? AND remaining_count > 0`
//! 4. zero rows affected means the coupon is sold out or never existed
//! 5. `COMMIT`
//!
//! Inserting the claim before touching supply turns "has this user claimed
//! already" into a single constraint check. The decrement's predicate is
//! evaluated by the database atomically with the write, so concurrent claims
//! can never push `remaining_count` below zero. No locks, queues or retries
//! live in this process.

use std::sync::Arc;

use coupon_core::{Claim, ClaimCoupon, CouponError, Result};
use coupon_store::{Store, StoreError, UnitOfWork};

/// Admits or rejects claim requests.
#[derive(Clone)]
pub struct ClaimProtocol {
    store: Arc<dyn Store>,
}

impl ClaimProtocol {
    /// Create a protocol instance over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Atomically claim one unit of a coupon for a user.
    ///
    /// On success the claim row and the decrement are both committed. On any
    /// error neither is.
    ///
    /// If the returned future is dropped before it completes, the open unit
    /// of work is dropped with it and rolled back by the store.
    ///
    /// # Errors
    ///
    /// - `CouponError::AlreadyClaimed` if the user already claimed this coupon.
    /// - `CouponError::SoldOutOrUnknownCoupon` if no supply is left or the
    ///   coupon does not exist.
    /// - `CouponError::Transient` for any other store failure, including a
    ///   failed commit.
    pub async fn claim(&self, request: ClaimCoupon) -> Result<Claim> {
        let claim = Claim::new(request.user_id, request.coupon_name);

        let mut uow = self
            .store
            .begin()
            .await
            .map_err(|e| transient(&claim, "begin", &e))?;

        if let Err(err) = uow.insert_claim(&claim).await {
            let rejection = match err {
                StoreError::UniqueViolation { .. } => CouponError::AlreadyClaimed {
                    user_id: claim.user_id.to_string(),
                    coupon_name: claim.coupon_name.to_string(),
                },
                // The claims -> coupons foreign key fired: the coupon never existed.
                StoreError::ForeignKeyViolation { .. } => sold_out(&claim),
                other => transient(&claim, "insert_claim", &other),
            };
            return Err(abort(uow, &claim, rejection).await);
        }

        match uow.conditional_decrement(&claim.coupon_name).await {
            Ok(0) => return Err(abort(uow, &claim, sold_out(&claim)).await),
            Ok(_) => {}
            Err(err) => {
                let failure = transient(&claim, "conditional_decrement", &err);
                return Err(abort(uow, &claim, failure).await);
            }
        }

        uow.commit()
            .await
            .map_err(|e| transient(&claim, "commit", &e))?;

        tracing::info!(
            coupon = %claim.coupon_name,
            user_id = %claim.user_id,
            outcome = "accepted",
            "Coupon claimed"
        );

        Ok(claim)
    }
}

/// Roll back a failed unit of work and hand back the outcome to report.
async fn abort(uow: Box<dyn UnitOfWork>, claim: &Claim, outcome: CouponError) -> CouponError {
    if let Err(e) = uow.rollback().await {
        // The connection is gone; the server discards the transaction with it.
        tracing::warn!(
            coupon = %claim.coupon_name,
            user_id = %claim.user_id,
            error = %e,
            "Rollback failed"
        );
    }

    if !outcome.is_retryable() {
        tracing::debug!(
            coupon = %claim.coupon_name,
            user_id = %claim.user_id,
            outcome = %outcome,
            "Claim rejected"
        );
    }

    outcome
}

fn sold_out(claim: &Claim) -> CouponError {
    CouponError::SoldOutOrUnknownCoupon {
        coupon_name: claim.coupon_name.to_string(),
    }
}

fn transient(claim: &Claim, step: &'static str, err: &StoreError) -> CouponError {
    tracing::warn!(
        coupon = %claim.coupon_name,
        user_id = %claim.user_id,
        step,
        error = %err,
        "Claim failed on store error"
    );
    CouponError::Transient(err.to_string())
}
