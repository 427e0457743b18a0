use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{EnrichmentStatus, ImpactLevel};
use crate::limits::MAX_TITLE_LEN;

/// Jurisdiction assigned to sources created before enrichment resolves one.
pub const UNKNOWN_JURISDICTION: &str = "unknown";

/// A stored public data source record. Partition key: `jurisdiction`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicSource {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Name of the publishing organization, when known.
    pub source_name: Option<String>,
    pub published_date: Option<String>,
    pub risk_area: Option<String>,
    pub jurisdiction: String,
    /// Populated by enrichment.
    pub summary: Option<String>,
    /// Populated by enrichment.
    pub key_points: Vec<String>,
    pub impact: Option<ImpactLevel>,
    pub enrichment_status: EnrichmentStatus,
    pub enrichment_attempts: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_enriched_at: Option<DateTime<Utc>>,
}

impl PublicSource {
    /// Build a stored record from a normalized draft. Rows that already carry
    /// a summary (bulk seeding) are stored `completed`; everything else starts
    /// `pending`.
    #[must_use]
    pub fn from_draft(draft: SourceDraft, id: String, now: DateTime<Utc>) -> Self {
        let enrichment_status = if draft.summary.is_some() {
            EnrichmentStatus::Completed
        } else {
            EnrichmentStatus::Pending
        };
        Self {
            id,
            title: draft.title,
            url: draft.url,
            source_name: draft.source_name,
            published_date: draft.published_date,
            risk_area: draft.risk_area,
            jurisdiction: draft
                .jurisdiction
                .unwrap_or_else(|| UNKNOWN_JURISDICTION.to_string()),
            summary: draft.summary,
            key_points: Vec::new(),
            impact: draft.impact,
            enrichment_status,
            enrichment_attempts: 0,
            created_at: now,
            updated_at: now,
            last_enriched_at: None,
        }
    }
}

/// Request/row shape for creating a public data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDraft {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub risk_area: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub impact: Option<ImpactLevel>,
}

impl SourceDraft {
    /// Normalize the draft, or report every field-level problem at once.
    ///
    /// # Errors
    ///
    /// Returns all field-level validation messages when any check fails.
    pub fn validated(mut self) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();

        let title = self.title.trim().to_string();
        if title.is_empty() {
            errors.push("title is required".to_string());
        } else if title.len() > MAX_TITLE_LEN {
            errors.push(format!("title exceeds {MAX_TITLE_LEN} characters"));
        }

        let url = self.url.trim().to_string();
        if !is_http_url(&url) {
            errors.push("url must start with http:// or https://".to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        self.title = title;
        self.url = url;
        self.jurisdiction = self
            .jurisdiction
            .map(|jurisdiction| jurisdiction.trim().to_string())
            .filter(|jurisdiction| !jurisdiction.is_empty());
        Ok(self)
    }
}

fn is_http_url(input: &str) -> bool {
    let rest = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"));
    rest.is_some_and(|tail| !tail.is_empty())
}

/// Enrichment payload written back onto a public source. `None` fields leave
/// the stored value untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceEnrichment {
    pub risk_area: Option<String>,
    pub summary: String,
    pub key_points: Vec<String>,
    pub jurisdiction: Option<String>,
    pub impact: Option<ImpactLevel>,
    pub source_name: Option<String>,
    pub published_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draft() -> SourceDraft {
        SourceDraft {
            title: "New data privacy ruling".to_string(),
            url: "https://example.com/ruling".to_string(),
            source_name: None,
            published_date: None,
            risk_area: None,
            jurisdiction: None,
            summary: None,
            impact: None,
        }
    }

    #[test]
    fn valid_draft_passes() {
        let normalized = draft().validated().unwrap();
        assert_eq!(normalized.title, "New data privacy ruling");
    }

    #[test]
    fn empty_title_rejected() {
        let mut bad = draft();
        bad.title = "  ".to_string();
        assert!(bad.validated().is_err());
    }

    #[test]
    fn non_http_url_rejected() {
        let mut bad = draft();
        bad.url = "ftp://example.com".to_string();
        let errors = bad.validated().unwrap_err();
        assert!(errors[0].contains("http"));
    }

    #[test]
    fn bare_scheme_rejected() {
        let mut bad = draft();
        bad.url = "https://".to_string();
        assert!(bad.validated().is_err());
    }

    #[test]
    fn blank_jurisdiction_normalized_away() {
        let mut blank = draft();
        blank.jurisdiction = Some("  ".to_string());
        let normalized = blank.validated().unwrap();
        assert!(normalized.jurisdiction.is_none());
    }

    #[test]
    fn from_draft_defaults_to_pending_and_unknown() {
        let record = PublicSource::from_draft(
            draft().validated().unwrap(),
            "pds-9f2e1c44".to_string(),
            chrono::Utc::now(),
        );
        assert_eq!(record.enrichment_status, EnrichmentStatus::Pending);
        assert_eq!(record.jurisdiction, UNKNOWN_JURISDICTION);
        assert_eq!(record.enrichment_attempts, 0);
        assert!(record.last_enriched_at.is_none());
    }

    #[test]
    fn seeded_summary_stores_completed() {
        let mut seeded = draft();
        seeded.summary = Some("Already summarized elsewhere.".to_string());
        let record = PublicSource::from_draft(
            seeded.validated().unwrap(),
            "pds-00aa11bb".to_string(),
            chrono::Utc::now(),
        );
        assert_eq!(record.enrichment_status, EnrichmentStatus::Completed);
    }
}
