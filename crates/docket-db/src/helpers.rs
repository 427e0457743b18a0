//! Row-to-entity parsing helpers.
//!
//! Every repo needs to convert `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic and handle the dual datetime
//! format issue (`SQLite`'s `datetime('now')` vs Rust's `to_rfc3339()`).

use chrono::{DateTime, Utc};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all docket-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Decode a JSON-encoded column (nested lists are stored as JSON TEXT).
///
/// # Errors
///
/// Returns `DatabaseError::Query` on invalid JSON.
pub fn parse_json<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_str(s)
        .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))
}

/// Encode a nested list for storage in a JSON TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::Other(e.into()))
}

/// Narrow an INTEGER column to `u32`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` for out-of-range values.
pub fn to_u32(value: i64) -> Result<u32, DatabaseError> {
    u32::try_from(value)
        .map_err(|_| DatabaseError::Query(format!("Integer column out of range: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_core::enums::EnrichmentStatus;

    #[test]
    fn parse_datetime_rfc3339() {
        let dt = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-02-09T14:30:00+00:00");
    }

    #[test]
    fn parse_datetime_sqlite_format() {
        assert!(parse_datetime("2026-02-09 14:30:00").is_ok());
    }

    #[test]
    fn parse_datetime_garbage_fails() {
        assert!(parse_datetime("not a date").is_err());
    }

    #[test]
    fn parse_enum_snake_case() {
        let status: EnrichmentStatus = parse_enum("in_progress").unwrap();
        assert_eq!(status, EnrichmentStatus::InProgress);
        assert!(parse_enum::<EnrichmentStatus>("bogus").is_err());
    }

    #[test]
    fn json_roundtrip() {
        let encoded = to_json(&vec!["a".to_string(), "b".to_string()]).unwrap();
        let decoded: Vec<String> = parse_json(&encoded).unwrap();
        assert_eq!(decoded, vec!["a", "b"]);
    }

    #[test]
    fn to_u32_rejects_negative() {
        assert!(to_u32(-1).is_err());
        assert_eq!(to_u32(7).unwrap(), 7);
    }
}
