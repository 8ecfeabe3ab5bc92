//! PostgreSQL storage implementation.
//!
//! Runs at the default `READ COMMITTED` isolation level. That is enough for
//! the conditional decrement: a blocked `UPDATE` re-evaluates its
//! `remaining_count > 0` predicate against the row version it finally locks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};

use coupon_core::{Claim, Coupon, CouponName, UserId};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::{coupon_from_row, Store, UnitOfWork};

/// PostgreSQL-backed storage implementation.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect a pool to the configured PostgreSQL database.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot establish a connection.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await?;

        tracing::info!(
            url = %config.redacted_url(),
            max_connections = config.max_connections,
            "Connected to PostgreSQL"
        );

        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn insert_coupon(&self, coupon: &Coupon) -> Result<()> {
        sqlx::query(
            "INSERT INTO coupons (name, total_limit, remaining_count, created_at) \
             VALUES ($1, $2, $3, $4)",
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
            "SELECT name, total_limit, remaining_count, created_at FROM coupons WHERE name = $1",
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(coupon_from_row)
        .transpose()
    }

    async fn list_claimants(&self, name: &CouponName) -> Result<Vec<UserId>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT user_id FROM claims WHERE coupon_name = $1 ORDER BY claimed_at, user_id",
        )
        .bind(name.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(user_id,)| UserId::new(user_id).map_err(Into::into))
            .collect()
    }

    async fn migrate(&self) -> Result<()> {
        tracing::info!("Applying PostgreSQL migrations");
        sqlx::migrate!("migrations/postgres").run(&self.pool).await?;
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
        "postgres"
    }
}

/// A PostgreSQL transaction.
struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn insert_claim(&mut self, claim: &Claim) -> Result<()> {
        sqlx::query("INSERT INTO claims (user_id, coupon_name, claimed_at) VALUES ($1, $2, $3)")
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
             WHERE name = $1 AND remaining_count > 0",
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
