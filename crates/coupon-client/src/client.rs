//! Coupon service HTTP client implementation.

use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, ClaimCouponRequest, ClaimCouponResponse, ClaimRecord, CouponDetail,
    CouponSummary, CreateCouponRequest, CreateCouponResponse, HealthResponse,
};

/// Coupon service API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct CouponClient {
    client: Client,
    base_url: String,
}

impl CouponClient {
    /// Create a new coupon client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the coupon service (e.g., `"http://coupons:8080"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new coupon client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a coupon with `amount` claimable units.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::DuplicateCoupon`] if the name is taken,
    /// [`ClientError::InvalidInput`] for a bad name or amount, or another
    /// error if the request fails.
    pub async fn create_coupon(
        &self,
        name: impl Into<String>,
        amount: i64,
    ) -> Result<CouponSummary, ClientError> {
        let url = format!("{}/api/coupons", self.base_url);
        let request = CreateCouponRequest {
            name: name.into(),
            amount,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let created: CreateCouponResponse = self.handle_response(response).await?;
        Ok(created.coupon)
    }

    /// Claim one unit of a coupon for a user.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AlreadyClaimed`],
    /// [`ClientError::SoldOutOrUnknownCoupon`] or [`ClientError::Transient`]
    /// for the corresponding outcomes, or another error if the request fails.
    pub async fn claim_coupon(
        &self,
        user_id: impl Into<String>,
        coupon_name: impl Into<String>,
    ) -> Result<ClaimRecord, ClientError> {
        let url = format!("{}/api/coupons/claim", self.base_url);
        let request = ClaimCouponRequest {
            user_id: user_id.into(),
            coupon_name: coupon_name.into(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let claimed: ClaimCouponResponse = self.handle_response(response).await?;
        Ok(claimed.claim)
    }

    /// Fetch a coupon's supply state and claimants.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the coupon does not exist, or
    /// another error if the request fails.
    pub async fn describe_coupon(&self, name: &str) -> Result<CouponDetail, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Configuration(format!("Invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::Configuration("Base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["api", "coupons", name]);

        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }

    /// Check service health.
    ///
    /// A degraded service (HTTP 503) still returns its health report.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a health report.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::SERVICE_UNAVAILABLE {
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }

        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code;
                let message = api_error.error.message;
                tracing::debug!(%status, %code, "Coupon service returned an error");

                // Map specific error codes to typed errors
                match code.as_str() {
                    "invalid_input" => Err(ClientError::InvalidInput { message }),
                    "duplicate_coupon" => Err(ClientError::DuplicateCoupon { message }),
                    "already_claimed" => Err(ClientError::AlreadyClaimed { message }),
                    "sold_out_or_unknown" => Err(ClientError::SoldOutOrUnknownCoupon { message }),
                    "not_found" => Err(ClientError::NotFound { message }),
                    "transient_failure" => Err(ClientError::Transient { message }),
                    _ => Err(ClientError::Api {
                        code,
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

impl ClientOptions {
    /// Create options with a request timeout.
    #[must_use]
    pub fn with_timeout_seconds(timeout_seconds: u64) -> Self {
        Self { timeout_seconds }
    }
}
