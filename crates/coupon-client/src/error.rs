//! Client error types.

/// Errors that can occur when using the coupon client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response with an unrecognised code.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// Request rejected as malformed.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Server message.
        message: String,
    },

    /// Coupon name already taken.
    #[error("duplicate coupon: {message}")]
    DuplicateCoupon {
        /// Server message.
        message: String,
    },

    /// The user already holds a claim on the coupon.
    #[error("already claimed: {message}")]
    AlreadyClaimed {
        /// Server message.
        message: String,
    },

    /// Coupon sold out or never created.
    #[error("sold out or unknown coupon: {message}")]
    SoldOutOrUnknownCoupon {
        /// Server message.
        message: String,
    },

    /// Coupon not found.
    #[error("not found: {message}")]
    NotFound {
        /// Server message.
        message: String,
    },

    /// Temporary server-side failure; the request may be retried.
    #[error("transient failure: {message}")]
    Transient {
        /// Server message.
        message: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Whether retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transient { .. } => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
