//! Unified error handling with Sentry integration.
//!
//! Each subsystem has its own error enum; `AppError` wraps them for the page
//! host. Failures the user cannot fix (store, fetch, config) are captured to
//! Sentry via [`AppError::report`]; user mistakes are only shown as notices.

use thiserror::Error;

use crate::cart::CartError;
use crate::config::ConfigError;
use crate::product::{FetchError, ProductError};
use crate::store::StoreError;
use tee_storefront_core::SizeError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The persistent store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The remote product fetch failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// A cart change was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// A size label was rejected.
    #[error("Invalid size: {0}")]
    Size(#[from] SizeError),

    /// The product fetch was denied by the client-side rate limit.
    #[error("Rate limited")]
    RateLimited,

    /// Host-side failure (terminal I/O and similar).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::RemoteFetch(e) => Self::Fetch(e),
            ProductError::Store(e) => Self::Store(e),
        }
    }
}

impl AppError {
    /// Returns `true` for failures the user did not cause.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Store(_) | Self::Fetch(_) | Self::Internal(_)
        )
    }

    /// Log the error and, for server errors, capture it to Sentry.
    pub fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::info!(error = %self, "User action rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Selected size", Some(&[("size", "M")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
