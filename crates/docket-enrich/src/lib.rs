//! # docket-enrich
//!
//! Background enrichment pipeline for Docket public sources.
//!
//! [`client::EnrichmentClient`] fetches the source article and asks an
//! OpenAI-compatible text-generation API for a structured summary.
//! [`worker::Enricher`] runs those calls as detached tasks behind a bounded
//! worker pool with per-record retry and exponential backoff, writing results
//! back through the store's status machine
//! (`pending → in_progress → completed | failed`). A record deleted while its
//! call is in flight has its result discarded, never resurrected. Enrichment
//! failures are recorded only in the status field and never surfaced to any
//! caller.

pub mod client;
mod error;
pub mod worker;

pub use client::EnrichmentClient;
pub use error::EnrichError;
pub use worker::{Enricher, RetryPolicy};
