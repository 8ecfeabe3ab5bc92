//! Error types for coupon storage.

use sqlx::error::ErrorKind;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("uniqueness violation: {}", constraint.as_deref().unwrap_or("unknown constraint"))]
    UniqueViolation {
        /// The violated constraint, when the backend reports it.
        constraint: Option<String>,
    },

    /// A foreign-key constraint rejected the write.
    #[error("foreign key violation: {}", constraint.as_deref().unwrap_or("unknown constraint"))]
    ForeignKeyViolation {
        /// The violated constraint, when the backend reports it.
        constraint: Option<String>,
    },

    /// Database operation failed (connection, pool, lock timeout, I/O).
    #[error("database error: {0}")]
    Database(String),

    /// A stored row could not be decoded into a domain type.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Applying migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// The store could not be configured (bad URL, unsupported scheme).
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().map(str::to_string);
                match db_err.kind() {
                    ErrorKind::UniqueViolation => Self::UniqueViolation { constraint },
                    ErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation { constraint },
                    _ => Self::Database(db_err.to_string()),
                }
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::Serialization(err.to_string())
            }
            sqlx::Error::Configuration(_) => Self::Configuration(err.to_string()),
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Migration(err.to_string())
    }
}

impl From<coupon_core::IdError> for StoreError {
    fn from(err: coupon_core::IdError) -> Self {
        Self::Serialization(err.to_string())
    }
}
