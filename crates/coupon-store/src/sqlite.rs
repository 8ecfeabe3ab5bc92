//! SQLite storage implementation.
//!
//! Uses a WAL-mode database file with foreign keys enforced. SQLite allows a
//! single writer at a time; a unit of work whose first statement is a write
//! waits on the busy timeout for the write lock instead of failing.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};

use coupon_core::{Claim, Coupon, CouponName, UserId};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::{coupon_from_row, Store, UnitOfWork};

/// How long a writer waits for the database write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// SQLite-backed storage implementation.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect a pool to the configured SQLite database, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the database cannot be opened.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?;
        Self::connect_with(options, config).await
    }

    /// Open (or create) a database file at the given path with default pool settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(path.as_ref());
        let config = StoreConfig::new(format!("sqlite://{}", path.as_ref().display()));
        Self::connect_with(options, &config).await
    }

    async fn connect_with(options: SqliteConnectOptions, config: &StoreConfig) -> Result<Self> {
        let options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;

        tracing::info!(url = %config.url, "Opened SQLite database");

        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqliteUnitOfWork { tx }))
    }

    async fn insert_coupon(&self, coupon: &Coupon) -> Result<()> {
        sqlx::query(
            "INSERT INTO coupons (name, total_limit, remaining_count, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(coupon.name.as_str())
        .bind(coupon.total_limit)
        .bind(coupon.remaining_count)
        .bind(coupon.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_coupon(&self, name: &CouponName) -> Result<Option<Coupon>> {
        sqlx::query_as::<_, (String, i64, i64, DateTime<Utc>)>(
            "SELECT name, total_limit, remaining_count, created_at FROM coupons WHERE name = ?",
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(coupon_from_row)
        .transpose()
    }

    async fn list_claimants(&self, name: &CouponName) -> Result<Vec<UserId>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT user_id FROM claims WHERE coupon_name = ? ORDER BY claimed_at, user_id",
        )
        .bind(name.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(user_id,)| UserId::new(user_id).map_err(Into::into))
            .collect()
    }

    async fn migrate(&self) -> Result<()> {
        tracing::info!("Applying SQLite migrations");
        sqlx::migrate!("migrations/sqlite").run(&self.pool).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

/// A SQLite transaction.
struct SqliteUnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    async fn insert_claim(&mut self, claim: &Claim) -> Result<()> {
        sqlx::query("INSERT INTO claims (user_id, coupon_name, claimed_at) VALUES (?, ?, ?)")
            .bind(claim.user_id.as_str())
            .bind(claim.coupon_name.as_str())
            .bind(claim.claimed_at)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn conditional_decrement(&mut self, coupon_name: &CouponName) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE coupons SET remaining_count = remaining_count - 1 \
             WHERE name = ? AND remaining_count > 0",
        )
        .bind(coupon_name.as_str())
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;
    use tempfile::TempDir;

    async fn create_test_store() -> (SqliteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path().join("coupons.db")).await.unwrap();
        store.migrate().await.unwrap();
        (store, dir)
    }

    fn name(s: &str) -> CouponName {
        CouponName::new(s).unwrap()
    }

    fn user(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    #[tokio::test]
    async fn coupon_insert_and_get() {
        let (store, _dir) = create_test_store().await;
        let coupon = Coupon::new(name("D100"), 100);

        store.insert_coupon(&coupon).await.unwrap();

        let retrieved = store.get_coupon(&coupon.name).await.unwrap().unwrap();
        assert_eq!(retrieved.name, coupon.name);
        assert_eq!(retrieved.total_limit, 100);
        assert_eq!(retrieved.remaining_count, 100);

        assert!(store.get_coupon(&name("NOPE")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_coupon_is_unique_violation() {
        let (store, _dir) = create_test_store().await;
        store.insert_coupon(&Coupon::new(name("X"), 10)).await.unwrap();

        let result = store.insert_coupon(&Coupon::new(name("X"), 3)).await;
        assert!(matches!(result, Err(StoreError::UniqueViolation { .. })));

        let coupon = store.get_coupon(&name("X")).await.unwrap().unwrap();
        assert_eq!(coupon.remaining_count, 10);
    }

    #[tokio::test]
    async fn committed_unit_of_work_is_durable() {
        let (store, _dir) = create_test_store().await;
        store.insert_coupon(&Coupon::new(name("X"), 2)).await.unwrap();

        let mut uow = store.begin().await.unwrap();
        uow.insert_claim(&Claim::new(user("u1"), name("X"))).await.unwrap();
        assert_eq!(uow.conditional_decrement(&name("X")).await.unwrap(), 1);
        uow.commit().await.unwrap();

        let coupon = store.get_coupon(&name("X")).await.unwrap().unwrap();
        assert_eq!(coupon.remaining_count, 1);
        assert_eq!(store.list_claimants(&name("X")).await.unwrap(), vec![user("u1")]);
    }

    #[tokio::test]
    async fn rolled_back_unit_of_work_leaves_no_trace() {
        let (store, _dir) = create_test_store().await;
        store.insert_coupon(&Coupon::new(name("X"), 2)).await.unwrap();

        let mut uow = store.begin().await.unwrap();
        uow.insert_claim(&Claim::new(user("u1"), name("X"))).await.unwrap();
        uow.conditional_decrement(&name("X")).await.unwrap();
        uow.rollback().await.unwrap();

        let coupon = store.get_coupon(&name("X")).await.unwrap().unwrap();
        assert_eq!(coupon.remaining_count, 2);
        assert!(store.list_claimants(&name("X")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dropped_unit_of_work_rolls_back() {
        let (store, _dir) = create_test_store().await;
        store.insert_coupon(&Coupon::new(name("X"), 2)).await.unwrap();

        {
            let mut uow = store.begin().await.unwrap();
            uow.insert_claim(&Claim::new(user("u1"), name("X"))).await.unwrap();
        }

        // The write lock is released once the rollback queued by the drop runs.
        let mut uow = store.begin().await.unwrap();
        uow.insert_claim(&Claim::new(user("u1"), name("X"))).await.unwrap();
        uow.commit().await.unwrap();

        assert_eq!(store.list_claimants(&name("X")).await.unwrap(), vec![user("u1")]);
    }

    #[tokio::test]
    async fn duplicate_claim_is_unique_violation() {
        let (store, _dir) = create_test_store().await;
        store.insert_coupon(&Coupon::new(name("X"), 5)).await.unwrap();

        let mut uow = store.begin().await.unwrap();
        uow.insert_claim(&Claim::new(user("u1"), name("X"))).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        let result = uow.insert_claim(&Claim::new(user("u1"), name("X"))).await;
        assert!(matches!(result, Err(StoreError::UniqueViolation { .. })));
        uow.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn claim_for_unknown_coupon_is_foreign_key_violation() {
        let (store, _dir) = create_test_store().await;

        let mut uow = store.begin().await.unwrap();
        let result = uow.insert_claim(&Claim::new(user("u1"), name("NOPE"))).await;
        assert!(matches!(result, Err(StoreError::ForeignKeyViolation { .. })));
        uow.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn conditional_decrement_stops_at_zero() {
        let (store, _dir) = create_test_store().await;
        store.insert_coupon(&Coupon::new(name("ONE"), 1)).await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.conditional_decrement(&name("ONE")).await.unwrap(), 1);
        assert_eq!(uow.conditional_decrement(&name("ONE")).await.unwrap(), 0);
        assert_eq!(uow.conditional_decrement(&name("NOPE")).await.unwrap(), 0);
        uow.commit().await.unwrap();

        let coupon = store.get_coupon(&name("ONE")).await.unwrap().unwrap();
        assert_eq!(coupon.remaining_count, 0);
    }

    #[tokio::test]
    async fn ping_and_backend() {
        let (store, _dir) = create_test_store().await;
        store.ping().await.unwrap();
        assert_eq!(store.backend(), "sqlite");
    }
}
