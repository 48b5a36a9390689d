//! Remote product source.
//!
//! Uses `reqwest` for a plain `GET` of the product endpoint. The endpoint is
//! idempotent and read-only; it returns a single [`ProductRecord`] as JSON.

use std::sync::Arc;

use tee_storefront_core::ProductRecord;
use thiserror::Error;
use tracing::instrument;

use crate::config::ProductApiConfig;

/// Errors that can occur when fetching the product.
///
/// Every variant leaves the cache and rate window untouched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Product endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not a valid product record.
    #[error("Malformed product payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Capability to fetch the current product from wherever it lives.
///
/// The page only ever needs one product, so there is no key argument.
#[allow(async_fn_in_trait)]
pub trait ProductSource {
    /// Fetch the current product record.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on network failure, a non-success response, or a
    /// malformed payload.
    async fn fetch_product(&self) -> Result<ProductRecord, FetchError>;
}

impl<P: ProductSource> ProductSource for &P {
    async fn fetch_product(&self) -> Result<ProductRecord, FetchError> {
        (**self).fetch_product().await
    }
}

impl<P: ProductSource> ProductSource for Arc<P> {
    async fn fetch_product(&self) -> Result<ProductRecord, FetchError> {
        (**self).fetch_product().await
    }
}

/// Fetches the product over HTTP.
#[derive(Clone)]
pub struct HttpProductSource {
    inner: Arc<HttpProductSourceInner>,
}

struct HttpProductSourceInner {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl std::fmt::Debug for HttpProductSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProductSource")
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpProductSource {
    /// Create a source for the configured endpoint.
    #[must_use]
    pub fn new(config: &ProductApiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a source using an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &ProductApiConfig) -> Self {
        Self {
            inner: Arc::new(HttpProductSourceInner {
                client,
                endpoint: config.url.clone(),
            }),
        }
    }

    /// The endpoint this source reads from.
    #[must_use]
    pub fn endpoint(&self) -> &url::Url {
        &self.inner.endpoint
    }
}

impl ProductSource for HttpProductSource {
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    async fn fetch_product(&self) -> Result<ProductRecord, FetchError> {
        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Product endpoint returned non-success status"
            );
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse product payload"
            );
            FetchError::Parse(e)
        })
    }
}
