//! ID prefix constants.
//!
//! Identifiers are formatted as `<prefix>-<8 hex chars>` (e.g., `att-a3f8b2c1`)
//! and are unique and immutable once assigned.

/// Attorney profile IDs.
pub const PREFIX_ATTORNEY: &str = "att";

/// Public data source IDs.
pub const PREFIX_SOURCE: &str = "pds";
