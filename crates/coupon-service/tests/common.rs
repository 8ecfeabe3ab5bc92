//! Common test utilities for coupon-service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use coupon_service::{create_router, AppState, ServiceConfig};
use coupon_store::{SqliteStore, Store, StoreConfig};

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The state behind the server, for driving components directly.
    pub state: AppState,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh, migrated database.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test harness, adjusting the service config before the router is built.
    pub async fn with_config(configure: impl FnOnce(&mut ServiceConfig)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = open_test_store(&temp_dir).await;

        let mut config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            database_url: format!("sqlite://{}", temp_dir.path().join("coupons.db").display()),
            ..ServiceConfig::default()
        };
        configure(&mut config);

        let state = AppState::new(store, config);
        let router: Router = create_router(state.clone());

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Create a coupon through the API, asserting success.
    pub async fn create_coupon(&self, name: &str, amount: i64) {
        self.server
            .post("/api/coupons")
            .json(&serde_json::json!({ "name": name, "amount": amount }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }
}

/// Open a migrated SQLite store inside `dir`.
pub async fn open_test_store(dir: &TempDir) -> Arc<dyn Store> {
    let config = StoreConfig {
        url: format!("sqlite://{}", dir.path().join("coupons.db").display()),
        max_connections: 8,
        min_connections: 0,
        acquire_timeout: Duration::from_secs(30),
    };

    let store = SqliteStore::connect(&config)
        .await
        .expect("Failed to open store");
    store.migrate().await.expect("Failed to migrate store");
    Arc::new(store)
}
