//! Public source update builder.
//!
//! Covers the caller-editable fields only; summary, key points, and status are
//! written exclusively through the enrichment operations.

use serde::{Deserialize, Serialize};

use docket_core::enums::ImpactLevel;
use docket_core::limits::MAX_TITLE_LEN;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<ImpactLevel>,
}

impl SourceUpdate {
    /// Check provided fields against the same limits as draft validation.
    ///
    /// # Errors
    ///
    /// Returns all field-level validation messages when any check fails.
    pub fn validated(self) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();
        if let Some(ref title) = self.title {
            if title.trim().is_empty() {
                errors.push("title cannot be empty".to_string());
            } else if title.len() > MAX_TITLE_LEN {
                errors.push(format!("title exceeds {MAX_TITLE_LEN} characters"));
            }
        }
        if let Some(ref url) = self.url {
            let stripped = url
                .strip_prefix("https://")
                .or_else(|| url.strip_prefix("http://"));
            if !stripped.is_some_and(|tail| !tail.is_empty()) {
                errors.push("url must start with http:// or https://".to_string());
            }
        }
        if let Some(ref jurisdiction) = self.jurisdiction {
            if jurisdiction.trim().is_empty() {
                errors.push("jurisdiction cannot be empty".to_string());
            }
        }
        if errors.is_empty() { Ok(self) } else { Err(errors) }
    }
}

pub struct SourceUpdateBuilder(SourceUpdate);

impl SourceUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(SourceUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, val: impl Into<String>) -> Self {
        self.0.title = Some(val.into());
        self
    }

    #[must_use]
    pub fn url(mut self, val: impl Into<String>) -> Self {
        self.0.url = Some(val.into());
        self
    }

    #[must_use]
    pub fn source_name(mut self, val: impl Into<String>) -> Self {
        self.0.source_name = Some(val.into());
        self
    }

    #[must_use]
    pub fn published_date(mut self, val: impl Into<String>) -> Self {
        self.0.published_date = Some(val.into());
        self
    }

    #[must_use]
    pub fn risk_area(mut self, val: impl Into<String>) -> Self {
        self.0.risk_area = Some(val.into());
        self
    }

    #[must_use]
    pub fn jurisdiction(mut self, val: impl Into<String>) -> Self {
        self.0.jurisdiction = Some(val.into());
        self
    }

    #[must_use]
    pub const fn impact(mut self, val: ImpactLevel) -> Self {
        self.0.impact = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> SourceUpdate {
        self.0
    }
}

impl Default for SourceUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
