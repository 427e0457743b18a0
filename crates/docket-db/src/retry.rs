//! Transient store error retry logic.
//!
//! Provides automatic retry with bounded exponential backoff for transient
//! backend errors (remote node recycling, lock contention, dropped
//! connections). These resolve on their own within seconds; genuine SQL or
//! constraint errors are never retried.

use std::time::Duration;

/// Configuration for retry behavior on transient store errors.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

/// Detect transient backend errors.
pub fn is_transient_error(error: &libsql::Error) -> bool {
    is_transient_message(&error.to_string())
}

/// The predicate is intentionally narrow to avoid retrying genuine SQL or
/// constraint errors.
fn is_transient_message(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("unable to acquire shared lock")
        || message.contains("database table is locked")
        || message.contains("connection closed")
        || message.contains("stream closed")
        || message.contains("timed out")
        || message.contains("temporarily unavailable")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bound_the_backoff() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 4);
        assert!(config.base_delay < config.max_delay);
    }

    #[test]
    fn constraint_errors_are_not_transient() {
        assert!(!is_transient_message("UNIQUE constraint failed: attorneys.email"));
        assert!(!is_transient_message("no such table: attorneys"));
    }

    #[test]
    fn infrastructure_errors_are_transient() {
        assert!(is_transient_message("database table is locked"));
        assert!(is_transient_message("Stream closed by peer"));
        assert!(is_transient_message("request timed out"));
    }
}
