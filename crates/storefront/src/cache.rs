//! Timestamped product cache backed by the key-value store.
//!
//! The cache holds a single product entry. It only answers "what is stored"
//! and "is it fresh"; deciding whether to refetch is up to
//! [`ProductDataService`](crate::product::ProductDataService).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tee_storefront_core::ProductRecord;

use crate::TTL_MS;
use crate::store::{KeyValueStore, PRODUCT_CACHE_KEY, StoreError};

/// A cached product with the time it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: ProductRecord,
    /// Fetch time, epoch milliseconds.
    pub timestamp: i64,
}

impl CacheEntry {
    /// Age of the entry at `now`, in milliseconds.
    #[must_use]
    pub const fn age_ms(&self, now: i64) -> i64 {
        now - self.timestamp
    }
}

/// Product cache stored under [`PRODUCT_CACHE_KEY`].
#[derive(Debug)]
pub struct ProductCache<S> {
    store: Arc<S>,
    ttl_ms: i64,
}

impl<S: KeyValueStore> ProductCache<S> {
    /// Create a cache with the page's TTL.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self::with_ttl(store, TTL_MS)
    }

    /// Create a cache with a custom TTL in milliseconds.
    #[must_use]
    pub const fn with_ttl(store: Arc<S>, ttl_ms: i64) -> Self {
        Self { store, ttl_ms }
    }

    /// Read the stored entry, fresh or not.
    ///
    /// An entry that cannot be decoded reads as absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read.
    pub fn read(&self) -> Result<Option<CacheEntry>, StoreError> {
        let Some(raw) = self.store.get(PRODUCT_CACHE_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring undecodable product cache entry");
                Ok(None)
            }
        }
    }

    /// Store `data` as fetched at `now`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the entry cannot be serialized or written.
    pub fn write(&self, data: ProductRecord, now: i64) -> Result<CacheEntry, StoreError> {
        let entry = CacheEntry {
            data,
            timestamp: now,
        };
        let json = serde_json::to_string(&entry).map_err(|source| StoreError::Serialize {
            key: PRODUCT_CACHE_KEY.to_string(),
            source,
        })?;
        self.store.set(PRODUCT_CACHE_KEY, &json)?;
        Ok(entry)
    }

    /// Returns `true` while `entry` is younger than the TTL at `now`.
    #[must_use]
    pub const fn is_fresh(&self, entry: &CacheEntry, now: i64) -> bool {
        entry.age_ms(now) < self.ttl_ms
    }

    /// Drop the stored entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be written.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(PRODUCT_CACHE_KEY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use tee_storefront_core::SizeOption;

    use super::*;
    use crate::store::MemoryStore;

    const T0: i64 = 1_700_000_000_000;

    fn record(title: &str) -> ProductRecord {
        ProductRecord {
            image_url: "https://cdn.example.com/tee.jpg".to_string(),
            title: title.to_string(),
            description: "Soft cotton.".to_string(),
            price: Decimal::new(75, 0),
            size_options: vec![SizeOption {
                label: "M".to_string(),
            }],
        }
    }

    fn cache() -> (Arc<MemoryStore>, ProductCache<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let cache = ProductCache::new(Arc::clone(&store));
        (store, cache)
    }

    #[test]
    fn test_read_empty() {
        let (_store, cache) = cache();
        assert!(cache.read().unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let (_store, cache) = cache();
        let written = cache.write(record("Tee"), T0).unwrap();

        let read = cache.read().unwrap().unwrap();
        assert_eq!(read, written);
        assert_eq!(read.timestamp, T0);
        assert_eq!(read.data.title, "Tee");
    }

    #[test]
    fn test_reads_within_ttl_are_identical() {
        let (_store, cache) = cache();
        cache.write(record("Tee"), T0).unwrap();

        let first = cache.read().unwrap().unwrap();
        let second = cache.read().unwrap().unwrap();
        assert!(cache.is_fresh(&first, T0 + 1));
        assert!(cache.is_fresh(&second, T0 + TTL_MS - 1));
        assert_eq!(first.data, second.data);
    }

    #[test]
    fn test_freshness_boundary() {
        let (_store, cache) = cache();
        let entry = cache.write(record("Tee"), T0).unwrap();

        assert!(cache.is_fresh(&entry, T0));
        assert!(cache.is_fresh(&entry, T0 + TTL_MS - 1));
        assert!(!cache.is_fresh(&entry, T0 + TTL_MS));
    }

    #[test]
    fn test_write_replaces_entry() {
        let (_store, cache) = cache();
        cache.write(record("Old"), T0).unwrap();
        cache.write(record("New"), T0 + 5).unwrap();

        let entry = cache.read().unwrap().unwrap();
        assert_eq!(entry.data.title, "New");
        assert_eq!(entry.timestamp, T0 + 5);
    }

    #[test]
    fn test_stored_shape() {
        let (store, cache) = cache();
        cache.write(record("Tee"), T0).unwrap();

        let raw = store.get(PRODUCT_CACHE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["timestamp"], T0);
        assert_eq!(value["data"]["title"], "Tee");
        assert_eq!(value["data"]["sizeOptions"][0]["label"], "M");
    }

    #[test]
    fn test_undecodable_entry_reads_as_absent() {
        let (store, cache) = cache();
        store.set(PRODUCT_CACHE_KEY, "{\"data\": 42}").unwrap();
        assert!(cache.read().unwrap().is_none());
    }

    #[test]
    fn test_clear() {
        let (store, cache) = cache();
        cache.write(record("Tee"), T0).unwrap();
        cache.clear().unwrap();
        assert!(cache.read().unwrap().is_none());
        assert!(store.is_empty());
    }
}
