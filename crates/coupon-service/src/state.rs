//! Application state.

use std::sync::Arc;

use coupon_store::Store;

use crate::claims::ClaimProtocol;
use crate::config::ServiceConfig;
use crate::query::QueryService;
use crate::registry::CouponRegistry;

/// Application state shared across handlers.
///
/// Every component holds the same store handle; none keeps mutable state of
/// its own.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn Store>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Coupon creation and lookup.
    pub registry: CouponRegistry,

    /// Claim admission.
    pub claims: ClaimProtocol,

    /// Coupon views.
    pub query: QueryService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        tracing::debug!(backend = store.backend(), "Building application state");

        Self {
            registry: CouponRegistry::new(Arc::clone(&store)),
            claims: ClaimProtocol::new(Arc::clone(&store)),
            query: QueryService::new(Arc::clone(&store)),
            store,
            config,
        }
    }
}
