//! Entity structs for all Docket domain objects.

mod attorney;
mod source;

pub use attorney::{AttorneyDraft, AttorneyProfile, MajorCase, PracticeArea};
pub use source::{PublicSource, SourceDraft, SourceEnrichment, UNKNOWN_JURISDICTION};
