use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{ImpactLevel, Proficiency, Seniority};
use crate::limits::{MAX_NAME_LEN, MAX_PRACTICE_AREAS, MAX_YEARS_EXPERIENCE};

/// One practice area with the attorney's standing in it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PracticeArea {
    pub area: String,
    #[serde(default)]
    pub proficiency: Proficiency,
    /// Years practicing this area. Capped at the attorney's total experience.
    #[serde(default)]
    pub years_in_practice: u32,
}

/// A major case on the attorney's record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MajorCase {
    pub title: String,
    pub outcome: String,
    pub impact: ImpactLevel,
}

/// A stored attorney profile. Partition key: `seniority`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttorneyProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub seniority: Seniority,
    pub years_of_experience: u32,
    pub practice_areas: Vec<PracticeArea>,
    pub major_cases: Vec<MajorCase>,
    pub jurisdictions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttorneyProfile {
    /// Build a stored profile from a normalized draft, assigning the generated
    /// identifier and creation timestamp. Pure — no I/O, no failure modes
    /// beyond what draft validation already caught.
    #[must_use]
    pub fn from_draft(draft: AttorneyDraft, id: String, now: DateTime<Utc>) -> Self {
        let email = draft
            .email
            .unwrap_or_else(|| derived_email(&draft.name));
        Self {
            id,
            name: draft.name,
            email,
            seniority: draft.seniority,
            years_of_experience: draft.years_of_experience,
            practice_areas: draft.practice_areas,
            major_cases: draft.major_cases,
            jurisdictions: draft.jurisdictions,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request/row shape for creating an attorney profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttorneyDraft {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub seniority: Seniority,
    pub years_of_experience: u32,
    #[serde(default)]
    pub practice_areas: Vec<PracticeArea>,
    #[serde(default)]
    pub major_cases: Vec<MajorCase>,
    pub jurisdictions: Vec<String>,
}

impl AttorneyDraft {
    /// Normalize the draft, or report every field-level problem at once.
    ///
    /// Normalization trims names and jurisdictions, deduplicates the
    /// jurisdiction set, caps per-area years at the total experience, and
    /// derives an email when none was supplied.
    ///
    /// # Errors
    ///
    /// Returns all field-level validation messages when any check fails;
    /// nothing is normalized in that case.
    pub fn validated(mut self) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.push("name is required".to_string());
        } else if name.len() > MAX_NAME_LEN {
            errors.push(format!("name exceeds {MAX_NAME_LEN} characters"));
        }

        if self.years_of_experience > MAX_YEARS_EXPERIENCE {
            errors.push(format!(
                "years_of_experience must be between 0 and {MAX_YEARS_EXPERIENCE}"
            ));
        }

        if self.practice_areas.len() > MAX_PRACTICE_AREAS {
            errors.push(format!("at most {MAX_PRACTICE_AREAS} practice areas allowed"));
        }
        for practice_area in &self.practice_areas {
            if practice_area.area.trim().is_empty() {
                errors.push("practice area name cannot be empty".to_string());
            }
        }

        if self
            .jurisdictions
            .iter()
            .all(|jurisdiction| jurisdiction.trim().is_empty())
        {
            errors.push("at least one jurisdiction is required".to_string());
        }

        if let Some(ref email) = self.email {
            if !looks_like_email(email) {
                errors.push(format!("invalid email format: {email}"));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        self.name = name;
        let mut seen = Vec::new();
        for jurisdiction in &self.jurisdictions {
            let trimmed = jurisdiction.trim();
            if !trimmed.is_empty() && !seen.iter().any(|known: &String| known == trimmed) {
                seen.push(trimmed.to_string());
            }
        }
        self.jurisdictions = seen;
        for practice_area in &mut self.practice_areas {
            practice_area.area = practice_area.area.trim().to_string();
            if practice_area.years_in_practice > self.years_of_experience {
                practice_area.years_in_practice = self.years_of_experience;
            }
        }
        if self.email.is_none() {
            self.email = Some(derived_email(&self.name));
        }
        Ok(self)
    }
}

fn looks_like_email(input: &str) -> bool {
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
}

/// Placeholder address for sheet rows without an email column.
fn derived_email(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(".");
    format!("{slug}@lawfirm.example")
}
