//! Status enums and fixed enumerations for Docket.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `EnrichmentStatus` provides `allowed_next_states()` to enforce valid
//! transitions at the application layer. Enumerations accepted from sheet
//! input additionally provide a lenient `parse()` that tolerates case and
//! whitespace variations.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Seniority
// ---------------------------------------------------------------------------

/// Seniority level of an attorney. Partition key for attorney profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seniority {
    Associate,
    SeniorAssociate,
    Partner,
    SeniorPartner,
}

impl Seniority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Associate => "associate",
            Self::SeniorAssociate => "senior_associate",
            Self::Partner => "partner",
            Self::SeniorPartner => "senior_partner",
        }
    }

    /// Lenient parse for sheet input: case-insensitive, accepts spaces or
    /// underscores between words (`"Senior Associate"` and `"senior_associate"`
    /// both resolve).
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input
            .trim()
            .to_lowercase()
            .split([' ', '_'])
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        match normalized.as_str() {
            "associate" => Some(Self::Associate),
            "senior_associate" => Some(Self::SeniorAssociate),
            "partner" => Some(Self::Partner),
            "senior_partner" => Some(Self::SeniorPartner),
            _ => None,
        }
    }
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Proficiency
// ---------------------------------------------------------------------------

/// Proficiency of an attorney in one practice area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proficiency {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl Proficiency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    /// Lenient parse for sheet input. Returns `None` for unrecognized values;
    /// callers fall back to [`Proficiency::default`].
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }
}

impl fmt::Display for Proficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ImpactLevel
// ---------------------------------------------------------------------------

/// Impact level of a major case or an enriched public source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Lenient parse for sheet and model output.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EnrichmentStatus
// ---------------------------------------------------------------------------

/// Status of a public source through its enrichment lifecycle.
///
/// ```text
/// pending → in_progress → completed
///                       → failed → in_progress (re-enrichment)
/// ```
///
/// A record never returns to `pending` after leaving it; `completed` is
/// terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl EnrichmentStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::InProgress],
            Self::InProgress => &[Self::Completed, Self::Failed],
            Self::Failed => &[Self::InProgress],
            Self::Completed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for EnrichmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- Serde roundtrip tests ---

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(
        seniority_senior_associate,
        Seniority,
        Seniority::SeniorAssociate,
        "senior_associate"
    );
    test_serde_roundtrip!(seniority_partner, Seniority, Seniority::Partner, "partner");

    test_serde_roundtrip!(
        proficiency_expert,
        Proficiency,
        Proficiency::Expert,
        "expert"
    );

    test_serde_roundtrip!(impact_medium, ImpactLevel, ImpactLevel::Medium, "medium");

    test_serde_roundtrip!(
        status_in_progress,
        EnrichmentStatus,
        EnrichmentStatus::InProgress,
        "in_progress"
    );
    test_serde_roundtrip!(
        status_completed,
        EnrichmentStatus,
        EnrichmentStatus::Completed,
        "completed"
    );

    // --- Lenient parse tests ---

    #[test]
    fn seniority_parse_tolerates_case_and_spaces() {
        assert_eq!(Seniority::parse("Senior Associate"), Some(Seniority::SeniorAssociate));
        assert_eq!(Seniority::parse("senior_associate"), Some(Seniority::SeniorAssociate));
        assert_eq!(Seniority::parse("  PARTNER  "), Some(Seniority::Partner));
        assert_eq!(Seniority::parse("Senior  Partner"), Some(Seniority::SeniorPartner));
        assert_eq!(Seniority::parse("of counsel"), None);
    }

    #[test]
    fn proficiency_parse_falls_through_on_unknown() {
        assert_eq!(Proficiency::parse("Expert"), Some(Proficiency::Expert));
        assert_eq!(Proficiency::parse("guru"), None);
    }

    #[test]
    fn impact_parse() {
        assert_eq!(ImpactLevel::parse("High"), Some(ImpactLevel::High));
        assert_eq!(ImpactLevel::parse("extreme"), None);
    }

    // --- Transition tests ---

    #[test]
    fn enrichment_valid_transitions() {
        assert!(EnrichmentStatus::Pending.can_transition_to(EnrichmentStatus::InProgress));
        assert!(EnrichmentStatus::InProgress.can_transition_to(EnrichmentStatus::Completed));
        assert!(EnrichmentStatus::InProgress.can_transition_to(EnrichmentStatus::Failed));
        assert!(EnrichmentStatus::Failed.can_transition_to(EnrichmentStatus::InProgress));
    }

    #[test]
    fn enrichment_never_reverts_to_pending() {
        for status in [
            EnrichmentStatus::InProgress,
            EnrichmentStatus::Completed,
            EnrichmentStatus::Failed,
        ] {
            assert!(!status.can_transition_to(EnrichmentStatus::Pending));
        }
    }

    #[test]
    fn enrichment_completed_is_terminal() {
        assert!(EnrichmentStatus::Completed.allowed_next_states().is_empty());
    }

    #[test]
    fn enrichment_pending_cannot_skip_ahead() {
        assert!(!EnrichmentStatus::Pending.can_transition_to(EnrichmentStatus::Completed));
        assert!(!EnrichmentStatus::Pending.can_transition_to(EnrichmentStatus::Failed));
    }

    // --- Display / as_str tests ---

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", Seniority::SeniorPartner), "senior_partner");
        assert_eq!(format!("{}", Proficiency::Intermediate), "intermediate");
        assert_eq!(format!("{}", ImpactLevel::Low), "low");
        assert_eq!(format!("{}", EnrichmentStatus::InProgress), "in_progress");
    }
}
