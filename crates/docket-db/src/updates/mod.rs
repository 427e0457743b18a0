//! Partial-update structs with builders.
//!
//! Fields left as `None` keep the stored value; updates are set-only (no field
//! can be nulled out through these types).

pub mod attorney;
pub mod source;
