//! Product data access: cache first, then a rate-limited remote fetch.
//!
//! # Lookup order
//!
//! 1. A fresh cache entry is returned as-is (no gate check, no network)
//! 2. Otherwise the rate gate is consulted; a denial falls back to the stale
//!    entry if there is one
//! 3. Otherwise the product is fetched, cached, and the call recorded
//!
//! A failed fetch changes nothing and is returned to the caller; there is no
//! automatic retry.
//!
//! # Example
//!
//! ```rust,ignore
//! use tee_storefront::product::{HttpProductSource, ProductDataService};
//!
//! let service = ProductDataService::new(store, HttpProductSource::new(&config.product_api), SystemClock);
//! if let Some(product) = service.get_product().await?.into_product() {
//!     println!("{}", product.title);
//! }
//! ```

mod source;

pub use source::{FetchError, HttpProductSource, ProductSource};

use std::sync::Arc;

use tee_storefront_core::ProductRecord;
use thiserror::Error;
use tracing::instrument;

use crate::cache::ProductCache;
use crate::clock::Clock;
use crate::rate_limit::RateLimitedFetchGate;
use crate::store::{KeyValueStore, StoreError};

/// Errors that can occur when looking up the product.
#[derive(Debug, Error)]
pub enum ProductError {
    /// The remote fetch failed (network, non-success status, or bad payload).
    #[error("Remote fetch failed: {0}")]
    RemoteFetch(#[from] FetchError),

    /// The cache or rate window could not be read or written.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of a product lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductLookup {
    /// Served from a fresh cache entry.
    Cached(ProductRecord),
    /// Fetched from the remote source just now.
    Fetched(ProductRecord),
    /// The rate limit denied a fetch. Carries the stale cache entry, if any.
    RateLimited { stale: Option<ProductRecord> },
}

impl ProductLookup {
    /// The product to render, if any.
    #[must_use]
    pub fn into_product(self) -> Option<ProductRecord> {
        match self {
            Self::Cached(product) | Self::Fetched(product) => Some(product),
            Self::RateLimited { stale } => stale,
        }
    }

    /// Borrow the product to render, if any.
    #[must_use]
    pub const fn product(&self) -> Option<&ProductRecord> {
        match self {
            Self::Cached(product) | Self::Fetched(product) => Some(product),
            Self::RateLimited { stale } => stale.as_ref(),
        }
    }

    /// Returns `true` if the rate limit denied a fetch.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Returns the freshest product the cache and rate limit allow.
#[derive(Debug)]
pub struct ProductDataService<S, P, C> {
    cache: ProductCache<S>,
    gate: RateLimitedFetchGate<S>,
    source: P,
    clock: C,
}

impl<S, P, C> ProductDataService<S, P, C>
where
    S: KeyValueStore,
    P: ProductSource,
    C: Clock,
{
    /// Create a service whose cache and rate gate share `store`.
    #[must_use]
    pub fn new(store: Arc<S>, source: P, clock: C) -> Self {
        Self::from_parts(
            ProductCache::new(Arc::clone(&store)),
            RateLimitedFetchGate::new(store),
            source,
            clock,
        )
    }

    /// Create a service from an explicitly configured cache and gate.
    #[must_use]
    pub const fn from_parts(
        cache: ProductCache<S>,
        gate: RateLimitedFetchGate<S>,
        source: P,
        clock: C,
    ) -> Self {
        Self {
            cache,
            gate,
            source,
            clock,
        }
    }

    /// Look up the product.
    ///
    /// Reads the clock once; the cache timestamp and rate window both use
    /// that value. Makes at most one remote call.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::RemoteFetch` if a permitted fetch fails, or
    /// `ProductError::Store` if the store cannot be read or written.
    #[instrument(skip(self))]
    pub async fn get_product(&self) -> Result<ProductLookup, ProductError> {
        let now = self.clock.now_ms();

        let stale = match self.cache.read()? {
            Some(entry) if self.cache.is_fresh(&entry, now) => {
                tracing::debug!(age_ms = entry.age_ms(now), "Serving product from cache");
                return Ok(ProductLookup::Cached(entry.data));
            }
            entry => entry.map(|entry| entry.data),
        };

        if !self.gate.check_and_maybe_reset(now)? {
            tracing::warn!(
                has_stale = stale.is_some(),
                "Product fetch denied by rate limit"
            );
            return Ok(ProductLookup::RateLimited { stale });
        }

        let product = self.source.fetch_product().await.map_err(|e| {
            tracing::warn!(error = %e, "Product fetch failed");
            e
        })?;

        self.cache.write(product.clone(), now)?;
        self.gate.record_call()?;
        tracing::info!(title = %product.title, "Fetched product");

        Ok(ProductLookup::Fetched(product))
    }

    /// The product cache.
    #[must_use]
    pub const fn cache(&self) -> &ProductCache<S> {
        &self.cache
    }

    /// The fetch rate gate.
    #[must_use]
    pub const fn gate(&self) -> &RateLimitedFetchGate<S> {
        &self.gate
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use rust_decimal::Decimal;
    use tee_storefront_core::SizeOption;

    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;
    use crate::{CALL_LIMIT, TTL_MS};

    const T0: i64 = 1_700_000_000_000;

    /// Source that replays queued responses and counts calls.
    #[derive(Default)]
    struct ScriptedSource {
        responses: RefCell<VecDeque<Result<ProductRecord, FetchError>>>,
        calls: Cell<u32>,
    }

    impl ScriptedSource {
        fn push_ok(&self, record: ProductRecord) {
            self.responses.borrow_mut().push_back(Ok(record));
        }

        fn push_err(&self, err: FetchError) {
            self.responses.borrow_mut().push_back(Err(err));
        }
    }

    impl ProductSource for ScriptedSource {
        async fn fetch_product(&self) -> Result<ProductRecord, FetchError> {
            self.calls.set(self.calls.get() + 1);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Status {
                    status: 599,
                    body: "no scripted response".to_string(),
                }))
        }
    }

    fn record(title: &str, price: i64) -> ProductRecord {
        ProductRecord {
            image_url: String::new(),
            title: title.to_string(),
            description: String::new(),
            price: Decimal::new(price, 0),
            size_options: vec![SizeOption {
                label: "S".to_string(),
            }],
        }
    }

    type Service<'a> = ProductDataService<MemoryStore, &'a ScriptedSource, &'a ManualClock>;

    fn service<'a>(
        store: &Arc<MemoryStore>,
        source: &'a ScriptedSource,
        clock: &'a ManualClock,
    ) -> Service<'a> {
        ProductDataService::new(Arc::clone(store), source, clock)
    }

    #[tokio::test]
    async fn test_empty_cache_fetches_and_caches() {
        let store = Arc::new(MemoryStore::new());
        let source = ScriptedSource::default();
        let clock = ManualClock::new(T0);
        let service = service(&store, &source, &clock);

        let fetched: ProductRecord =
            serde_json::from_str(r#"{"title":"Tee","price":25,"sizeOptions":[{"label":"S"}]}"#)
                .unwrap();
        source.push_ok(fetched.clone());

        let lookup = service.get_product().await.unwrap();
        assert_eq!(lookup, ProductLookup::Fetched(fetched.clone()));

        let entry = service.cache().read().unwrap().unwrap();
        assert_eq!(entry.data, fetched);
        assert_eq!(entry.timestamp, T0);
        assert_eq!(service.gate().window().unwrap().unwrap().call_count, 1);
        assert_eq!(source.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_fetch_and_gate() {
        let store = Arc::new(MemoryStore::new());
        let source = ScriptedSource::default();
        let clock = ManualClock::new(T0);
        let service = service(&store, &source, &clock);

        service.cache().write(record("R", 75), T0).unwrap();
        clock.advance(TTL_MS - 1);

        let lookup = service.get_product().await.unwrap();
        assert_eq!(lookup, ProductLookup::Cached(record("R", 75)));
        assert_eq!(source.calls.get(), 0);
        // The gate was never consulted, so no window exists
        assert!(service.gate().window().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stale_cache_refetches() {
        let store = Arc::new(MemoryStore::new());
        let source = ScriptedSource::default();
        let clock = ManualClock::new(T0);
        let service = service(&store, &source, &clock);

        service.cache().write(record("Old", 75), T0).unwrap();
        clock.advance(TTL_MS);
        source.push_ok(record("New", 80));

        let lookup = service.get_product().await.unwrap();
        assert_eq!(lookup, ProductLookup::Fetched(record("New", 80)));
        assert_eq!(service.cache().read().unwrap().unwrap().timestamp, T0 + TTL_MS);
    }

    #[tokio::test]
    async fn test_rate_limited_falls_back_to_stale() {
        let store = Arc::new(MemoryStore::new());
        let source = ScriptedSource::default();
        let clock = ManualClock::new(T0);
        let service = service(&store, &source, &clock);

        service.cache().write(record("Stale", 75), T0 - TTL_MS).unwrap();
        assert!(service.gate().check_and_maybe_reset(T0).unwrap());
        for _ in 0..CALL_LIMIT {
            service.gate().record_call().unwrap();
        }

        let lookup = service.get_product().await.unwrap();
        assert!(lookup.is_rate_limited());
        assert_eq!(lookup.product().map(|p| p.title.as_str()), Some("Stale"));
        assert_eq!(source.calls.get(), 0);
        assert_eq!(
            service.gate().window().unwrap().unwrap().call_count,
            CALL_LIMIT
        );
    }

    #[tokio::test]
    async fn test_rate_limited_without_cache_is_absent() {
        let store = Arc::new(MemoryStore::new());
        let source = ScriptedSource::default();
        let clock = ManualClock::new(T0);
        let service = service(&store, &source, &clock);

        assert!(service.gate().check_and_maybe_reset(T0).unwrap());
        for _ in 0..CALL_LIMIT {
            service.gate().record_call().unwrap();
        }

        let lookup = service.get_product().await.unwrap();
        assert_eq!(lookup, ProductLookup::RateLimited { stale: None });
        assert!(lookup.into_product().is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_changes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let source = ScriptedSource::default();
        let clock = ManualClock::new(T0);
        let service = service(&store, &source, &clock);

        service.cache().write(record("Stale", 75), T0 - TTL_MS).unwrap();
        source.push_err(FetchError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        });

        let err = service.get_product().await.unwrap_err();
        assert!(matches!(
            err,
            ProductError::RemoteFetch(FetchError::Status { status: 502, .. })
        ));

        let entry = service.cache().read().unwrap().unwrap();
        assert_eq!(entry.data.title, "Stale");
        assert_eq!(entry.timestamp, T0 - TTL_MS);
        assert_eq!(service.gate().window().unwrap().unwrap().call_count, 0);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_remote_fetch_error() {
        let store = Arc::new(MemoryStore::new());
        let source = ScriptedSource::default();
        let clock = ManualClock::new(T0);
        let service = service(&store, &source, &clock);

        let parse_err = serde_json::from_str::<ProductRecord>("{}").unwrap_err();
        source.push_err(FetchError::Parse(parse_err));

        let err = service.get_product().await.unwrap_err();
        assert!(matches!(err, ProductError::RemoteFetch(FetchError::Parse(_))));
        assert!(service.cache().read().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_limit_reached_after_repeated_stale_fetches() {
        let store = Arc::new(MemoryStore::new());
        let source = ScriptedSource::default();
        let clock = ManualClock::new(T0);
        // A zero-TTL cache forces every lookup to the gate
        let service = ProductDataService::from_parts(
            ProductCache::with_ttl(Arc::clone(&store), 0),
            RateLimitedFetchGate::new(Arc::clone(&store)),
            &source,
            &clock,
        );

        for i in 0..CALL_LIMIT {
            source.push_ok(record(&format!("v{i}"), 75));
            let lookup = service.get_product().await.unwrap();
            assert!(matches!(lookup, ProductLookup::Fetched(_)));
            clock.advance(1_000);
        }

        let lookup = service.get_product().await.unwrap();
        assert_eq!(
            lookup.product().map(|p| p.title.clone()),
            Some(format!("v{}", CALL_LIMIT - 1))
        );
        assert!(lookup.is_rate_limited());
        assert_eq!(source.calls.get(), CALL_LIMIT);
    }
}
