//! Attorney update builder.

use serde::{Deserialize, Serialize};

use docket_core::entities::{MajorCase, PracticeArea};
use docket_core::enums::Seniority;
use docket_core::limits::{MAX_NAME_LEN, MAX_PRACTICE_AREAS, MAX_YEARS_EXPERIENCE};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttorneyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seniority: Option<Seniority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practice_areas: Option<Vec<PracticeArea>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_cases: Option<Vec<MajorCase>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdictions: Option<Vec<String>>,
}

impl AttorneyUpdate {
    /// Check provided fields against the same limits as draft validation.
    ///
    /// # Errors
    ///
    /// Returns all field-level validation messages when any check fails.
    pub fn validated(self) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();
        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                errors.push("name cannot be empty".to_string());
            } else if name.len() > MAX_NAME_LEN {
                errors.push(format!("name exceeds {MAX_NAME_LEN} characters"));
            }
        }
        if let Some(years) = self.years_of_experience {
            if years > MAX_YEARS_EXPERIENCE {
                errors.push(format!(
                    "years_of_experience must be between 0 and {MAX_YEARS_EXPERIENCE}"
                ));
            }
        }
        if let Some(ref areas) = self.practice_areas {
            if areas.len() > MAX_PRACTICE_AREAS {
                errors.push(format!("at most {MAX_PRACTICE_AREAS} practice areas allowed"));
            }
        }
        if let Some(ref jurisdictions) = self.jurisdictions {
            if jurisdictions.iter().all(|j| j.trim().is_empty()) {
                errors.push("at least one jurisdiction is required".to_string());
            }
        }
        if errors.is_empty() { Ok(self) } else { Err(errors) }
    }
}

pub struct AttorneyUpdateBuilder(AttorneyUpdate);

impl AttorneyUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(AttorneyUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    #[must_use]
    pub fn email(mut self, val: impl Into<String>) -> Self {
        self.0.email = Some(val.into());
        self
    }

    #[must_use]
    pub const fn seniority(mut self, val: Seniority) -> Self {
        self.0.seniority = Some(val);
        self
    }

    #[must_use]
    pub const fn years_of_experience(mut self, val: u32) -> Self {
        self.0.years_of_experience = Some(val);
        self
    }

    #[must_use]
    pub fn practice_areas(mut self, val: Vec<PracticeArea>) -> Self {
        self.0.practice_areas = Some(val);
        self
    }

    #[must_use]
    pub fn major_cases(mut self, val: Vec<MajorCase>) -> Self {
        self.0.major_cases = Some(val);
        self
    }

    #[must_use]
    pub fn jurisdictions(mut self, val: Vec<String>) -> Self {
        self.0.jurisdictions = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> AttorneyUpdate {
        self.0
    }
}

impl Default for AttorneyUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
