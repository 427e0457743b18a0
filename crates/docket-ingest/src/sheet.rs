//! Shared sheet plumbing: header normalization and per-row outcomes.

use std::fmt;

use csv::StringRecord;
use serde::Serialize;

/// One row that failed validation. `row` is the 1-based sheet row number
/// (the header is row 1, the first data row is 2).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.message)
    }
}

/// Parsed sheet: normalized drafts plus the rows that failed validation.
#[derive(Debug)]
pub struct SheetOutcome<T> {
    pub records: Vec<T>,
    pub errors: Vec<RowError>,
}

impl<T> Default for SheetOutcome<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Header row with column names normalized to lowercase.
pub(crate) struct Header {
    columns: Vec<String>,
}

impl Header {
    pub(crate) fn from_record(record: &StringRecord) -> Self {
        Self {
            columns: record
                .iter()
                .map(|column| column.trim().to_lowercase())
                .collect(),
        }
    }

    pub(crate) fn index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub(crate) fn missing(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.index(name).is_none())
            .map(|name| (*name).to_string())
            .collect()
    }
}

/// Read one cell: trimmed, with empty cells treated as absent.
pub(crate) fn field<'a>(record: &'a StringRecord, idx: Option<usize>) -> Option<&'a str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
