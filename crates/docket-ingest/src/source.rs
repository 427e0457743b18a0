//! Public source sheet parsing.
//!
//! Expected columns (case-insensitive): `title`, `url`; optional `risk_area`,
//! `summary`, `source`, `published_date`, `jurisdiction`, `impact_level`.
//! Rows that carry a summary are later stored as already enriched.

use std::io::Read;

use csv::StringRecord;

use docket_core::entities::SourceDraft;
use docket_core::enums::ImpactLevel;

use crate::error::IngestError;
use crate::sheet::{Header, RowError, SheetOutcome, field};

const REQUIRED_COLUMNS: &[&str] = &["title", "url"];

/// Parse and validate a public source sheet.
///
/// # Errors
///
/// Returns [`IngestError`] when the sheet cannot be read at all or required
/// columns are absent. Row-level problems land in the outcome's `errors`.
pub fn parse_source_sheet<R: Read>(reader: R) -> Result<SheetOutcome<SourceDraft>, IngestError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let header = Header::from_record(csv_reader.headers()?);
    let missing = header.missing(REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }

    let mut outcome = SheetOutcome::default();
    for (index, record) in csv_reader.records().enumerate() {
        let sheet_row = index + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                outcome.errors.push(RowError {
                    row: sheet_row,
                    message: format!("unreadable row: {e}"),
                });
                continue;
            }
        };
        match parse_row(&header, &record) {
            Ok(draft) => outcome.records.push(draft),
            Err(messages) => outcome.errors.push(RowError {
                row: sheet_row,
                message: messages.join("; "),
            }),
        }
    }
    Ok(outcome)
}

fn parse_row(header: &Header, record: &StringRecord) -> Result<SourceDraft, Vec<String>> {
    let mut errors = Vec::new();

    let title = field(record, header.index("title"));
    if title.is_none() {
        errors.push("title is required".to_string());
    }
    let url = field(record, header.index("url"));
    if url.is_none() {
        errors.push("url is required".to_string());
    }

    let impact = match field(record, header.index("impact_level")) {
        Some(raw) => {
            let parsed = ImpactLevel::parse(raw);
            if parsed.is_none() {
                errors.push(format!(
                    "invalid impact_level '{raw}' (use low, medium, high)"
                ));
            }
            parsed
        }
        None => None,
    };

    let (Some(title), Some(url)) = (title, url) else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    SourceDraft {
        title: title.to_string(),
        url: url.to_string(),
        source_name: field(record, header.index("source")).map(String::from),
        published_date: field(record, header.index("published_date")).map(String::from),
        risk_area: field(record, header.index("risk_area")).map(String::from),
        jurisdiction: field(record, header.index("jurisdiction")).map(String::from),
        summary: field(record, header.index("summary")).map(String::from),
        impact,
    }
    .validated()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_minimal_rows() {
        let sheet = "title,url\nPrivacy ruling,https://example.com/a\n";
        let outcome = parse_source_sheet(sheet.as_bytes()).unwrap();
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].title, "Privacy ruling");
        assert!(outcome.records[0].jurisdiction.is_none());
    }

    #[test]
    fn optional_columns_are_picked_up() {
        let sheet = "title,url,risk_area,summary,source,jurisdiction,impact_level\n\
Ruling,https://example.com/a,Tax,Already summarized,Example Times,Canada,High\n";
        let outcome = parse_source_sheet(sheet.as_bytes()).unwrap();
        let draft = &outcome.records[0];
        assert_eq!(draft.risk_area.as_deref(), Some("Tax"));
        assert_eq!(draft.summary.as_deref(), Some("Already summarized"));
        assert_eq!(draft.source_name.as_deref(), Some("Example Times"));
        assert_eq!(draft.jurisdiction.as_deref(), Some("Canada"));
        assert_eq!(draft.impact, Some(ImpactLevel::High));
    }

    #[test]
    fn missing_required_columns_fail_the_sheet() {
        let result = parse_source_sheet("title\nRuling\n".as_bytes());
        assert!(matches!(result, Err(IngestError::MissingColumns(_))));
    }

    #[test]
    fn bad_url_and_impact_are_row_errors() {
        let sheet = "title,url,impact_level\n\
Ruling,ftp://example.com/a,\n\
Other,https://example.com/b,extreme\n\
Fine,https://example.com/c,low\n";
        let outcome = parse_source_sheet(sheet.as_bytes()).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.errors[0].row, 2);
        assert!(outcome.errors[0].message.contains("url"));
        assert_eq!(outcome.errors[1].row, 3);
        assert!(outcome.errors[1].message.contains("impact_level"));
    }

    #[test]
    fn blank_lines_between_rows_are_skipped() {
        let sheet = "title,url\nRuling,https://example.com/a\n\nOther,https://example.com/b\n";
        let outcome = parse_source_sheet(sheet.as_bytes()).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.errors.is_empty());
    }
}
