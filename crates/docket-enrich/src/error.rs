//! Enrichment error types.

use thiserror::Error;

/// Errors from the enrichment pipeline.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The text-generation API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The model response could not be parsed into an enrichment payload.
    #[error("parse error: {0}")]
    Parse(String),
}
