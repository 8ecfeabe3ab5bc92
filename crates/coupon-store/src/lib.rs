//! Storage layer for the coupon claim service.
//!
//! This crate provides persistent storage for coupons and claims on top of a
//! transactional SQL database. All cross-request synchronization is delegated
//! to the database: a primary key on `claims(user_id, coupon_name)` serializes
//! duplicate claims, and a conditional `UPDATE ... WHERE remaining_count > 0`
//! serializes supply.
//!
//! # Architecture
//!
//! The storage uses two tables:
//!
//! - `coupons(name PK, total_limit, remaining_count, created_at)`
//! - `claims(user_id, coupon_name -> coupons.name, claimed_at, PK(user_id, coupon_name))`
//!
//! Two backends implement [`Store`]:
//!
//! - [`PgStore`]: PostgreSQL, for production.
//! - [`SqliteStore`]: a SQLite file, for single-node deployments and tests.
//!
//! # Example
//!
//! ```no_run
//! use coupon_store::{connect, StoreConfig};
//! use coupon_core::{Coupon, CouponName};
//!
//! # async fn example() -> coupon_store::Result<()> {
//! let store = connect(&StoreConfig::new("sqlite:///tmp/coupons.db")).await?;
//! store.migrate().await?;
//!
//! let coupon = Coupon::new(CouponName::new("FLASH5").unwrap(), 5);
//! store.insert_coupon(&coupon).await?;
//!
//! let retrieved = store.get_coupon(&coupon.name).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod postgres;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use postgres::PgStore;
pub use sqlite::SqliteStore;

use coupon_core::{Claim, Coupon, CouponName, UserId};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing the service to run
/// against PostgreSQL in production and SQLite in tests.
#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // Units of Work
    // =========================================================================

    /// Open an atomic unit of work.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can be acquired or `BEGIN` fails.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>>;

    // =========================================================================
    // Coupon Operations
    // =========================================================================

    /// Insert a new coupon record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UniqueViolation` if a coupon with the same name exists.
    async fn insert_coupon(&self, coupon: &Coupon) -> Result<()>;

    /// Get a coupon by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_coupon(&self, name: &CouponName) -> Result<Option<Coupon>>;

    // =========================================================================
    // Claim Operations
    // =========================================================================

    /// List every user holding a committed claim on a coupon.
    ///
    /// Ordered by claim time, then user id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_claimants(&self, name: &CouponName) -> Result<Vec<UserId>>;

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Apply the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Migration` if a migration fails.
    async fn migrate(&self) -> Result<()>;

    /// Check that the database answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached.
    async fn ping(&self) -> Result<()>;

    /// Close the connection pool, waiting for checked-out connections to return.
    async fn close(&self);

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}

/// An open atomic unit of work.
///
/// Either `commit` or `rollback` ends it. A unit of work dropped without
/// either is rolled back when its connection returns to the pool, so an
/// abandoned request never leaves row locks behind.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Insert a claim row.
    ///
    /// # Errors
    ///
    /// - `StoreError::UniqueViolation` if the user already claimed the coupon.
    /// - `StoreError::ForeignKeyViolation` if the coupon does not exist.
    async fn insert_claim(&mut self, claim: &Claim) -> Result<()>;

    /// Decrement `remaining_count` by one if the coupon exists and has supply left.
    ///
    /// The check and the write are a single statement evaluated by the
    /// database. Returns the number of rows affected, `0` or `1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn conditional_decrement(&mut self, coupon_name: &CouponName) -> Result<u64>;

    /// Commit all writes made in this unit of work.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails; nothing is then durable.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discard all writes made in this unit of work.
    ///
    /// Safe to call after a failed statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection failed while rolling back.
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Open a store for the configured URL.
///
/// `postgres://` and `postgresql://` URLs open a [`PgStore`]; `sqlite:` URLs
/// open a [`SqliteStore`].
///
/// # Errors
///
/// Returns `StoreError::Configuration` for an unsupported scheme, or a
/// database error if the pool cannot connect.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn Store>> {
    let url = config.url.as_str();

    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(Arc::new(PgStore::connect(config).await?))
    } else if url.starts_with("sqlite:") {
        Ok(Arc::new(SqliteStore::connect(config).await?))
    } else {
        Err(StoreError::Configuration(format!(
            "unsupported database URL scheme: {}",
            config.redacted_url()
        )))
    }
}

/// Decode a `coupons` row.
pub(crate) fn coupon_from_row(
    (name, total_limit, remaining_count, created_at): (
        String,
        i64,
        i64,
        chrono::DateTime<chrono::Utc>,
    ),
) -> Result<Coupon> {
    Ok(Coupon {
        name: CouponName::new(name)?,
        total_limit,
        remaining_count,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_rejects_unknown_scheme() {
        let result = connect(&StoreConfig::new("mysql://root@localhost/coupons")).await;
        assert!(matches!(result, Err(StoreError::Configuration(_))));
    }
}
