//! Ingest error types.
//!
//! Sheet-level failures only; per-row problems are data, not errors — see
//! [`crate::RowError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// The sheet itself could not be read.
    #[error("Failed to read sheet: {0}")]
    Read(#[from] csv::Error),

    /// Required columns are absent from the header row.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}
