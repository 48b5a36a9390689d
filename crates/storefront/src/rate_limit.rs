//! Client-side rate limiting for the remote product endpoint.
//!
//! The endpoint sits behind infrastructure that may throttle it, so the page
//! allows at most [`CALL_LIMIT`](crate::CALL_LIMIT) remote fetches per
//! hour-long window. The window is fixed, not sliding: it starts when the
//! first permission check after expiry runs, and the count resets only when
//! the window has aged past [`TTL_MS`](crate::TTL_MS).
//!
//! # Call sequence
//!
//! 1. [`RateLimitedFetchGate::check_and_maybe_reset`] before every prospective fetch
//! 2. [`RateLimitedFetchGate::record_call`] exactly once after a successful fetch
//!
//! Cache hits and denied attempts never record a call.

use std::sync::Arc;

use serde::Serialize;

use crate::store::{CALL_COUNT_KEY, KeyValueStore, StoreError, WINDOW_START_KEY};
use crate::{CALL_LIMIT, TTL_MS};

/// Remote calls made in the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateWindow {
    /// Successful remote fetches since `window_start`.
    pub call_count: u32,
    /// Window start, epoch milliseconds.
    pub window_start: i64,
}

impl RateWindow {
    /// Returns `true` once the window has aged past `ttl_ms`.
    #[must_use]
    pub const fn is_expired(&self, now: i64, ttl_ms: i64) -> bool {
        now - self.window_start > ttl_ms
    }
}

/// Decides whether a remote fetch is permitted in the current window.
///
/// State lives entirely in the key-value store so it carries across
/// restarts. Not safe for concurrent use; the page runs on one UI thread.
#[derive(Debug)]
pub struct RateLimitedFetchGate<S> {
    store: Arc<S>,
    ttl_ms: i64,
    limit: u32,
}

impl<S: KeyValueStore> RateLimitedFetchGate<S> {
    /// Create a gate with the page's window length and call limit.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self::with_limits(store, TTL_MS, CALL_LIMIT)
    }

    /// Create a gate with a custom window length and call limit.
    #[must_use]
    pub const fn with_limits(store: Arc<S>, ttl_ms: i64, limit: u32) -> Self {
        Self {
            store,
            ttl_ms,
            limit,
        }
    }

    /// Read the current window, if one has been started.
    ///
    /// A window start that cannot be parsed reads as no window; a call count
    /// that cannot be parsed reads as 0.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read.
    pub fn window(&self) -> Result<Option<RateWindow>, StoreError> {
        let Some(raw_start) = self.store.get(WINDOW_START_KEY)? else {
            return Ok(None);
        };

        let Ok(window_start) = raw_start.trim().parse::<i64>() else {
            tracing::warn!(value = %raw_start, "Ignoring unparseable rate window start");
            return Ok(None);
        };

        Ok(Some(RateWindow {
            call_count: self.call_count()?,
            window_start,
        }))
    }

    /// Check whether a remote fetch is permitted at `now`.
    ///
    /// Starts a fresh window (count 0, start `now`) and permits the fetch when
    /// there is no window yet or the current one has expired. Otherwise the
    /// fetch is permitted while the count is below the limit. Never increments
    /// the count.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read or written.
    pub fn check_and_maybe_reset(&self, now: i64) -> Result<bool, StoreError> {
        match self.window()? {
            Some(window) if !window.is_expired(now, self.ttl_ms) => {
                let permitted = window.call_count < self.limit;
                if !permitted {
                    tracing::warn!(
                        call_count = window.call_count,
                        limit = self.limit,
                        window_start = window.window_start,
                        "Product fetch rate limit reached"
                    );
                }
                Ok(permitted)
            }
            _ => {
                self.store.set(CALL_COUNT_KEY, "0")?;
                self.store.set(WINDOW_START_KEY, &now.to_string())?;
                tracing::debug!(window_start = now, "Started new rate window");
                Ok(true)
            }
        }
    }

    /// Record one successful remote fetch.
    ///
    /// Re-reads the stored count rather than trusting a value read before the
    /// fetch suspended.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read or written.
    pub fn record_call(&self) -> Result<(), StoreError> {
        let count = self.call_count()?.saturating_add(1);
        self.store.set(CALL_COUNT_KEY, &count.to_string())?;
        tracing::debug!(call_count = count, limit = self.limit, "Recorded product fetch");
        Ok(())
    }

    /// Forget the current window so the next check starts a new one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be written.
    pub fn reset(&self) -> Result<(), StoreError> {
        self.store.remove(CALL_COUNT_KEY)?;
        self.store.remove(WINDOW_START_KEY)
    }

    /// Calls allowed per window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Window length in milliseconds.
    #[must_use]
    pub const fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    fn call_count(&self) -> Result<u32, StoreError> {
        let Some(raw) = self.store.get(CALL_COUNT_KEY)? else {
            return Ok(0);
        };
        Ok(raw.trim().parse::<u32>().unwrap_or_else(|_| {
            tracing::warn!(value = %raw, "Treating unparseable call count as 0");
            0
        }))
    }
}
