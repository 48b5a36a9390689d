//! Product cache commands.
//!
//! # Usage
//!
//! ```bash
//! tee-cli cache show
//! tee-cli cache clear
//! ```

use std::fmt::Write;
use std::sync::Arc;

use tee_storefront::cache::ProductCache;
use tee_storefront::store::KeyValueStore;

use super::{CommandError, format_duration, format_timestamp};

/// Describe the cached product entry at `now`.
///
/// # Errors
///
/// Returns `CommandError` if the store cannot be read or the product cannot be
/// rendered.
pub fn show<S: KeyValueStore>(store: Arc<S>, now: i64) -> Result<String, CommandError> {
    let cache = ProductCache::new(store);
    let Some(entry) = cache.read()? else {
        return Ok("No cached product.".to_string());
    };

    let freshness = if cache.is_fresh(&entry, now) {
        "fresh"
    } else {
        "stale"
    };

    let mut out = String::new();
    let _ = writeln!(out, "Product:   {} ({})", entry.data.title, entry.data.display_price());
    let _ = writeln!(out, "Fetched:   {}", format_timestamp(entry.timestamp));
    let _ = writeln!(
        out,
        "Age:       {} ({freshness})",
        format_duration(entry.age_ms(now))
    );
    let _ = write!(out, "{}", serde_json::to_string_pretty(&entry.data)?);
    Ok(out)
}

/// Remove the cached product.
///
/// # Errors
///
/// Returns `CommandError` if the store cannot be written.
pub fn clear<S: KeyValueStore>(store: Arc<S>) -> Result<String, CommandError> {
    let cache = ProductCache::new(store);
    if cache.read()?.is_none() {
        return Ok("No cached product.".to_string());
    }

    cache.clear()?;
    tracing::info!("Product cache cleared");
    Ok("Product cache cleared.".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tee_storefront::TTL_MS;
    use tee_storefront::store::FileStore;
    use tee_storefront_core::ProductRecord;

    use super::*;

    fn product() -> ProductRecord {
        serde_json::from_str(
            r#"{"title":"Classic Tee","price":75,"sizeOptions":[{"label":"S"},{"label":"M"}]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_show_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path().join("store.json")).unwrap());

        assert_eq!(show(store, 0).unwrap(), "No cached product.");
    }

    #[test]
    fn test_show_reports_freshness() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path().join("store.json")).unwrap());
        ProductCache::new(Arc::clone(&store))
            .write(product(), 1_000)
            .unwrap();

        let fresh = show(Arc::clone(&store), 1_000 + 90_000).unwrap();
        assert!(fresh.starts_with("Product:   Classic Tee ($75)\n"));
        assert!(fresh.contains("Age:       0h 01m 30s (fresh)"));
        assert!(fresh.contains("\"sizeOptions\""));

        let stale = show(store, 1_000 + TTL_MS).unwrap();
        assert!(stale.contains("(stale)"));
    }

    #[test]
    fn test_clear_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = Arc::new(FileStore::open(&path).unwrap());
        ProductCache::new(Arc::clone(&store))
            .write(product(), 1_000)
            .unwrap();

        assert_eq!(clear(store).unwrap(), "Product cache cleared.");

        let reopened = Arc::new(FileStore::open(&path).unwrap());
        assert!(ProductCache::new(Arc::clone(&reopened)).read().unwrap().is_none());
        assert_eq!(clear(reopened).unwrap(), "No cached product.");
    }
}
