//! # docket-ingest
//!
//! Sheet validation for Docket bulk uploads.
//!
//! Parses CSV sheets with a header row into normalized drafts. Column names
//! are case-insensitive; rows are validated independently, so one invalid row
//! never blocks the others — it is reported as a [`RowError`] naming the
//! failing sheet row instead. Missing required columns fail the whole sheet.

mod attorney;
mod error;
mod sheet;
mod source;

pub use attorney::parse_attorney_sheet;
pub use error::IngestError;
pub use sheet::{RowError, SheetOutcome};
pub use source::parse_source_sheet;
