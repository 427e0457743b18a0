//! Attorney sheet parsing.
//!
//! Expected columns (case-insensitive): `name`, `seniority`,
//! `years_of_experience`, `jurisdictions` (semicolon-separated), optional
//! `email`, and up to three practice area groups (`practice_area_N`,
//! `proficiency_N`, `years_in_practice_N`). An unrecognized proficiency falls
//! back to `intermediate`; a missing email is derived from the name.

use std::io::Read;

use csv::StringRecord;

use docket_core::entities::{AttorneyDraft, PracticeArea};
use docket_core::enums::{Proficiency, Seniority};

use crate::error::IngestError;
use crate::sheet::{Header, RowError, SheetOutcome, field};

const REQUIRED_COLUMNS: &[&str] = &["name", "seniority", "years_of_experience", "jurisdictions"];
const PRACTICE_AREA_GROUPS: usize = 3;

/// Parse and validate an attorney sheet.
///
/// # Errors
///
/// Returns [`IngestError`] when the sheet cannot be read at all or required
/// columns are absent. Row-level problems land in the outcome's `errors`.
pub fn parse_attorney_sheet<R: Read>(
    reader: R,
) -> Result<SheetOutcome<AttorneyDraft>, IngestError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let header = Header::from_record(csv_reader.headers()?);
    let missing = header.missing(REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }

    let mut outcome = SheetOutcome::default();
    for (index, record) in csv_reader.records().enumerate() {
        // Header is sheet row 1.
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

fn parse_row(header: &Header, record: &StringRecord) -> Result<AttorneyDraft, Vec<String>> {
    let mut errors = Vec::new();

    let name = field(record, header.index("name"));
    if name.is_none() {
        errors.push("name is required".to_string());
    }

    let seniority = match field(record, header.index("seniority")) {
        Some(raw) => {
            let parsed = Seniority::parse(raw);
            if parsed.is_none() {
                errors.push(format!(
                    "invalid seniority level '{raw}' (use associate, senior_associate, partner, senior_partner)"
                ));
            }
            parsed
        }
        None => {
            errors.push("seniority is required".to_string());
            None
        }
    };

    let years_of_experience = match field(record, header.index("years_of_experience")) {
        Some(raw) => {
            let parsed = raw.parse::<u32>().ok();
            if parsed.is_none() {
                errors.push("years_of_experience must be a non-negative number".to_string());
            }
            parsed
        }
        None => {
            errors.push("years_of_experience is required".to_string());
            None
        }
    };

    let jurisdictions: Vec<String> = field(record, header.index("jurisdictions"))
        .map(|raw| {
            raw.split(';')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    if jurisdictions.is_empty() {
        errors.push("at least one jurisdiction is required".to_string());
    }

    let email = field(record, header.index("email")).map(String::from);

    let mut practice_areas = Vec::new();
    for group in 1..=PRACTICE_AREA_GROUPS {
        let Some(area) = field(record, header.index(&format!("practice_area_{group}"))) else {
            continue;
        };
        let proficiency = field(record, header.index(&format!("proficiency_{group}")))
            .and_then(Proficiency::parse)
            .unwrap_or_default();
        let years_in_practice = field(record, header.index(&format!("years_in_practice_{group}")))
            .and_then(|raw| raw.parse::<u32>().ok())
            .unwrap_or(0);
        practice_areas.push(PracticeArea {
            area: area.to_string(),
            proficiency,
            years_in_practice,
        });
    }

    match (name, seniority, years_of_experience, errors.is_empty()) {
        (Some(name), Some(seniority), Some(years_of_experience), true) => AttorneyDraft {
            name: name.to_string(),
            email,
            seniority,
            years_of_experience,
            practice_areas,
            major_cases: Vec::new(),
            jurisdictions,
        }
        .validated(),
        _ => Err(errors),
    }
}
