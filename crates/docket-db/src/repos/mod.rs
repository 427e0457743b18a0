//! Repository modules implementing CRUD operations for all Docket entities.
//!
//! Each module adds methods to `DocketService` via `impl DocketService` blocks.

pub mod attorney;
pub mod source;

use serde::Serialize;

/// Result of a bulk create: ids that were written plus the rows the store
/// refused, with reasons. One refused row never blocks the others.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkOutcome {
    pub created_ids: Vec<String>,
    pub skipped: Vec<SkippedRecord>,
}

/// One record a bulk create declined to write.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    /// Human-readable label for the row (name or title).
    pub label: String,
    pub reason: String,
}
