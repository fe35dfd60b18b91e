use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::RateLimitConfig;
use crate::store::StoreError;

/// Rate-limited JSON client for the dealership backend
///
/// Every request waits for a permit from a direct `governor` limiter and
/// carries the configured bearer token, if any.
#[derive(Debug, Clone)]
pub struct RateLimitedHttpClient {
    client: Client,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    token: Option<String>,
}

impl RateLimitedHttpClient {
    /// Create a new rate-limited HTTP client
    pub fn new(
        token: Option<String>,
        timeout: Duration,
        rate_limit: &RateLimitConfig,
    ) -> Result<Self, StoreError> {
        let per_second = NonZeroU32::new(rate_limit.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(rate_limit.burst).unwrap_or(per_second);
        let quota = Quota::per_second(per_second).allow_burst(burst);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            rate_limiter,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.authorized(self.client.get(url))
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.authorized(self.client.post(url))
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(header::CONTENT_TYPE, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request once a rate-limit permit is available and decode the
    /// JSON body. Non-2xx answers become [`StoreError::Rejected`].
    pub async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;

        let response = request.send().await?;
        let response = Self::ensure_success(response).await?;
        let body = response.bytes().await?;

        debug!(bytes = body.len(), "Decoding backend response");
        Ok(serde_json::from_slice(&body)?)
    }

    async fn ensure_success(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
