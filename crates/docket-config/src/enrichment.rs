//! Enrichment (text-generation API) configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_model() -> String {
    String::from("gpt-4o")
}

const fn default_max_tokens() -> u32 {
    3000
}

/// Default bound on concurrently running enrichment tasks.
const fn default_workers() -> usize {
    4
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_base_delay_ms() -> u64 {
    1000
}

const fn default_max_delay_ms() -> u64 {
    30_000
}

const fn default_request_timeout_secs() -> u64 {
    30
}

/// Default cap on fetched article content passed to the model.
const fn default_content_char_limit() -> usize {
    5000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnrichmentConfig {
    /// Chat-completions endpoint URL.
    #[serde(default)]
    pub api_url: String,

    /// API key, sent as a bearer token.
    #[serde(default)]
    pub api_key: String,

    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// Completion token budget.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Maximum concurrently running enrichment tasks.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Attempts per record (including the initial one).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial retry delay in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Retry delay cap in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Per-request timeout in seconds (covers fetch and completion calls).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Cap on fetched article content characters passed to the model.
    #[serde(default = "default_content_char_limit")]
    pub content_char_limit: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            workers: default_workers(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            content_char_limit: default_content_char_limit(),
        }
    }
}

impl EnrichmentConfig {
    /// Check if the enrichment config has the minimum required fields.
    /// When unconfigured, background enrichment is disabled and new sources
    /// stay `pending`.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_url.is_empty() && !self.api_key.is_empty()
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
