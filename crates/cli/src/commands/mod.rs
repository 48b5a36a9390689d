//! CLI subcommands.
//!
//! Each command returns the text to print so it can be checked in tests.

pub mod cache;
pub mod rate_limit;

use std::path::Path;
use std::sync::Arc;

use tee_storefront::config::ConfigError;
use tee_storefront::store::{FileStore, StoreError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The store file could not be read or written.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Output could not be rendered.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Open the store file shared with the storefront.
pub fn open_store(path: &Path) -> Result<Arc<FileStore>, CommandError> {
    let store = FileStore::open(path)?;
    tracing::debug!(path = %store.path().display(), "Opened store file");
    Ok(Arc::new(store))
}

/// Format an epoch-millisecond timestamp as RFC 3339, or the raw value if out of range.
fn format_timestamp(epoch_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(epoch_ms)
        .map_or_else(|| epoch_ms.to_string(), |dt| dt.to_rfc3339())
}

/// Format a millisecond duration as `1h 02m 03s`.
fn format_duration(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let secs = ms.unsigned_abs() / 1000;
    format!(
        "{sign}{}h {:02}m {:02}s",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0h 00m 00s");
        assert_eq!(format_duration(3_723_000), "1h 02m 03s");
        assert_eq!(format_duration(-61_000), "-0h 01m 01s");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00+00:00");
        assert_eq!(format_timestamp(i64::MAX), i64::MAX.to_string());
    }
}
