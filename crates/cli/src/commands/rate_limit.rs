//! Rate window commands.
//!
//! # Usage
//!
//! ```bash
//! tee-cli rate-limit show
//! tee-cli rate-limit reset
//! ```

use std::fmt::Write;
use std::sync::Arc;

use tee_storefront::rate_limit::RateLimitedFetchGate;
use tee_storefront::store::KeyValueStore;

use super::{CommandError, format_duration, format_timestamp};

/// Describe the current rate window at `now`.
///
/// # Errors
///
/// Returns `CommandError` if the store cannot be read.
pub fn show<S: KeyValueStore>(store: Arc<S>, now: i64) -> Result<String, CommandError> {
    let gate = RateLimitedFetchGate::new(store);
    let Some(window) = gate.window()? else {
        return Ok(format!(
            "No rate window started. 0/{} calls used.",
            gate.limit()
        ));
    };

    let mut out = String::new();
    let _ = writeln!(out, "Calls:     {}/{}", window.call_count, gate.limit());
    let _ = writeln!(out, "Started:   {}", format_timestamp(window.window_start));

    if window.is_expired(now, gate.ttl_ms()) {
        let _ = write!(out, "Window:    expired (next check starts a new one)");
    } else {
        let remaining = window.window_start + gate.ttl_ms() - now;
        let state = if window.call_count < gate.limit() {
            "open"
        } else {
            "exhausted"
        };
        let _ = write!(
            out,
            "Window:    {state}, resets in {}",
            format_duration(remaining)
        );
    }
    Ok(out)
}

/// Forget the current window.
///
/// # Errors
///
/// Returns `CommandError` if the store cannot be written.
pub fn reset<S: KeyValueStore>(store: Arc<S>) -> Result<String, CommandError> {
    RateLimitedFetchGate::new(store).reset()?;
    tracing::info!("Rate window reset");
    Ok("Rate window reset.".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tee_storefront::store::{CALL_COUNT_KEY, FileStore, MemoryStore, WINDOW_START_KEY};
    use tee_storefront::{CALL_LIMIT, TTL_MS};

    use super::*;

    fn store_with_window(count: u32, start: i64) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.set(CALL_COUNT_KEY, &count.to_string()).unwrap();
        store.set(WINDOW_START_KEY, &start.to_string()).unwrap();
        store
    }

    #[test]
    fn test_show_without_window() {
        let store = Arc::new(MemoryStore::new());
        assert_eq!(
            show(store, 0).unwrap(),
            format!("No rate window started. 0/{CALL_LIMIT} calls used.")
        );
    }

    #[test]
    fn test_show_open_window() {
        let store = store_with_window(2, 0);
        let text = show(store, 30 * 60 * 1000).unwrap();

        assert!(text.starts_with(&format!("Calls:     2/{CALL_LIMIT}\n")));
        assert!(text.ends_with("Window:    open, resets in 0h 30m 00s"));
    }

    #[test]
    fn test_show_exhausted_window() {
        let store = store_with_window(CALL_LIMIT, 0);
        let text = show(store, TTL_MS).unwrap();
        assert!(text.ends_with("Window:    exhausted, resets in 0h 00m 00s"));
    }

    #[test]
    fn test_show_expired_window() {
        let store = store_with_window(CALL_LIMIT, 0);
        let text = show(store, TTL_MS + 1).unwrap();
        assert!(text.contains("expired"));
    }

    #[test]
    fn test_reset_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = Arc::new(FileStore::open(&path).unwrap());
        store.set(CALL_COUNT_KEY, "5").unwrap();
        store.set(WINDOW_START_KEY, "1000").unwrap();

        assert_eq!(reset(store).unwrap(), "Rate window reset.");

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(CALL_COUNT_KEY).unwrap(), None);
        assert_eq!(reopened.get(WINDOW_START_KEY).unwrap(), None);
    }
}
