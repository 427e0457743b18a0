//! Public data source repository — CRUD, filtered listing, bulk create, and
//! the enrichment status operations.
//!
//! Enrichment transitions are enforced with guarded UPDATEs (`WHERE
//! enrichment_status = <expected>`), so a record deleted or concurrently
//! transitioned mid-flight surfaces as `NotFound` and the caller's result is
//! discarded rather than resurrected.

use chrono::Utc;

use docket_core::entities::{PublicSource, SourceDraft, SourceEnrichment};
use docket_core::enums::EnrichmentStatus;
use docket_core::ids::PREFIX_SOURCE;

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, parse_datetime, parse_enum, parse_json, parse_optional_datetime, to_json,
    to_u32,
};
use crate::repos::{BulkOutcome, SkippedRecord};
use crate::service::DocketService;
use crate::updates::source::SourceUpdate;

const SOURCE_COLUMNS: &str = "id, title, url, source_name, published_date, risk_area, \
     jurisdiction, summary, key_points, impact, enrichment_status, enrichment_attempts, \
     created_at, updated_at, last_enriched_at";

fn row_to_source(row: &libsql::Row) -> Result<PublicSource, DatabaseError> {
    let impact = match get_opt_string(row, 9)? {
        Some(raw) => Some(parse_enum(&raw)?),
        None => None,
    };
    Ok(PublicSource {
        id: row.get::<String>(0)?,
        title: row.get::<String>(1)?,
        url: row.get::<String>(2)?,
        source_name: get_opt_string(row, 3)?,
        published_date: get_opt_string(row, 4)?,
        risk_area: get_opt_string(row, 5)?,
        jurisdiction: row.get::<String>(6)?,
        summary: get_opt_string(row, 7)?,
        key_points: parse_json(&row.get::<String>(8)?)?,
        impact,
        enrichment_status: parse_enum(&row.get::<String>(10)?)?,
        enrichment_attempts: to_u32(row.get::<i64>(11)?)?,
        created_at: parse_datetime(&row.get::<String>(12)?)?,
        updated_at: parse_datetime(&row.get::<String>(13)?)?,
        last_enriched_at: parse_optional_datetime(get_opt_string(row, 14)?.as_deref())?,
    })
}

/// Optional filters for listing public sources.
#[derive(Debug, Clone, Default)]
pub struct SourceFilter {
    pub risk_area: Option<String>,
    pub jurisdiction: Option<String>,
    pub enrichment_status: Option<EnrichmentStatus>,
}

impl DocketService {
    /// Create a public data source from a normalized draft. Rows seeded with a
    /// summary are stored `completed`; everything else starts `pending`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the write fails.
    pub async fn create_source(&self, draft: SourceDraft) -> Result<PublicSource, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SOURCE).await?;
        let source = PublicSource::from_draft(draft, id, now);

        let key_points = to_json(&source.key_points)?;
        self.db()
            .execute_with(
                "INSERT INTO public_sources (id, title, url, source_name, published_date, \
                 risk_area, jurisdiction, summary, key_points, impact, enrichment_status, \
                 enrichment_attempts, created_at, updated_at, last_enriched_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                || {
                    libsql::params![
                        source.id.as_str(),
                        source.title.as_str(),
                        source.url.as_str(),
                        source.source_name.as_deref(),
                        source.published_date.as_deref(),
                        source.risk_area.as_deref(),
                        source.jurisdiction.as_str(),
                        source.summary.as_deref(),
                        key_points.as_str(),
                        source.impact.map(docket_core::enums::ImpactLevel::as_str),
                        source.enrichment_status.as_str(),
                        i64::from(source.enrichment_attempts),
                        now.to_rfc3339(),
                        now.to_rfc3339(),
                        Option::<String>::None
                    ]
                },
            )
            .await?;

        Ok(source)
    }

    /// Point read by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::NotFound`] when no record matches.
    pub async fn get_source(&self, id: &str) -> Result<PublicSource, DatabaseError> {
        let mut rows = self
            .db()
            .query(
                &format!("SELECT {SOURCE_COLUMNS} FROM public_sources WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
            entity_type: "public_source",
            id: id.to_string(),
        })?;
        row_to_source(&row)
    }

    /// List sources, optionally narrowed by risk area, jurisdiction, and
    /// enrichment status.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_sources(
        &self,
        filter: &SourceFilter,
    ) -> Result<Vec<PublicSource>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        if let Some(ref risk_area) = filter.risk_area {
            conditions.push(format!("risk_area = ?{idx}"));
            params.push(risk_area.as_str().into());
            idx += 1;
        }
        if let Some(ref jurisdiction) = filter.jurisdiction {
            conditions.push(format!("jurisdiction = ?{idx}"));
            params.push(jurisdiction.as_str().into());
            idx += 1;
        }
        if let Some(status) = filter.enrichment_status {
            conditions.push(format!("enrichment_status = ?{idx}"));
            params.push(status.as_str().into());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT {SOURCE_COLUMNS} FROM public_sources{where_clause} ORDER BY created_at DESC"
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;

        let mut sources = Vec::new();
        while let Some(row) = rows.next().await? {
            sources.push(row_to_source(&row)?);
        }
        Ok(sources)
    }

    /// Partial update of caller-editable fields; bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::NotFound`] when no record matches.
    pub async fn update_source(
        &self,
        id: &str,
        update: SourceUpdate,
    ) -> Result<PublicSource, DatabaseError> {
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        if let Some(ref title) = update.title {
            sets.push(format!("title = ?{idx}"));
            params.push(title.as_str().into());
            idx += 1;
        }
        if let Some(ref url) = update.url {
            sets.push(format!("url = ?{idx}"));
            params.push(url.as_str().into());
            idx += 1;
        }
        if let Some(ref source_name) = update.source_name {
            sets.push(format!("source_name = ?{idx}"));
            params.push(source_name.as_str().into());
            idx += 1;
        }
        if let Some(ref published_date) = update.published_date {
            sets.push(format!("published_date = ?{idx}"));
            params.push(published_date.as_str().into());
            idx += 1;
        }
        if let Some(ref risk_area) = update.risk_area {
            sets.push(format!("risk_area = ?{idx}"));
            params.push(risk_area.as_str().into());
            idx += 1;
        }
        if let Some(ref jurisdiction) = update.jurisdiction {
            sets.push(format!("jurisdiction = ?{idx}"));
            params.push(jurisdiction.as_str().into());
            idx += 1;
        }
        if let Some(impact) = update.impact {
            sets.push(format!("impact = ?{idx}"));
            params.push(impact.as_str().into());
            idx += 1;
        }

        if sets.is_empty() {
            return self.get_source(id).await;
        }

        let now = Utc::now();
        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.to_rfc3339().into());
        idx += 1;

        params.push(id.into());
        let sql = format!(
            "UPDATE public_sources SET {} WHERE id = ?{idx}",
            sets.join(", ")
        );
        let affected = self
            .db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        if affected == 0 {
            return Err(DatabaseError::NotFound {
                entity_type: "public_source",
                id: id.to_string(),
            });
        }

        self.get_source(id).await
    }

    /// Partition-key-scoped delete.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::NotFound`] when no record matches the id and
    /// partition key.
    pub async fn delete_source(&self, id: &str, jurisdiction: &str) -> Result<(), DatabaseError> {
        let affected = self
            .db()
            .execute_with(
                "DELETE FROM public_sources WHERE id = ?1 AND jurisdiction = ?2",
                || libsql::params![id, jurisdiction],
            )
            .await?;
        if affected == 0 {
            return Err(DatabaseError::NotFound {
                entity_type: "public_source",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Create many sources; refused rows are reported and do not block the rest.
    ///
    /// # Errors
    ///
    /// Never fails on per-row problems; only infallible bookkeeping remains.
    pub async fn bulk_create_sources(
        &self,
        drafts: Vec<SourceDraft>,
    ) -> Result<BulkOutcome, DatabaseError> {
        let mut outcome = BulkOutcome::default();
        for draft in drafts {
            let label = draft.title.clone();
            match self.create_source(draft).await {
                Ok(source) => outcome.created_ids.push(source.id),
                Err(e) => {
                    tracing::warn!(row = %label, error = %e, "skipping source row");
                    outcome.skipped.push(SkippedRecord {
                        label,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(outcome)
    }

    /// Move a source into `in_progress` and return it.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::InvalidState`] when the status machine forbids
    /// the transition (e.g., already completed or already in progress), and
    /// [`DatabaseError::NotFound`] when the record vanished.
    pub async fn begin_enrichment(&self, id: &str) -> Result<PublicSource, DatabaseError> {
        let source = self.get_source(id).await?;
        let status = source.enrichment_status;
        if !status.can_transition_to(EnrichmentStatus::InProgress) {
            return Err(DatabaseError::InvalidState(format!(
                "cannot begin enrichment for {id}: status is {status}"
            )));
        }

        let now = Utc::now();
        let affected = self
            .db()
            .execute_with(
                "UPDATE public_sources SET enrichment_status = ?1, updated_at = ?2 \
                 WHERE id = ?3 AND enrichment_status = ?4",
                || {
                    libsql::params![
                        EnrichmentStatus::InProgress.as_str(),
                        now.to_rfc3339(),
                        id,
                        status.as_str()
                    ]
                },
            )
            .await?;
        if affected == 0 {
            return Err(DatabaseError::NotFound {
                entity_type: "public_source",
                id: id.to_string(),
            });
        }
        self.get_source(id).await
    }

    /// Write an enrichment result and mark the record `completed`. `None`
    /// fields of the payload leave the stored values untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::NotFound`] when the record was deleted (or left
    /// `in_progress`) while the enrichment call was in flight; the caller
    /// discards the result.
    pub async fn complete_enrichment(
        &self,
        id: &str,
        enrichment: &SourceEnrichment,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let key_points = to_json(&enrichment.key_points)?;
        let affected = self
            .db()
            .execute_with(
                "UPDATE public_sources SET \
                 risk_area = COALESCE(?1, risk_area), \
                 summary = ?2, \
                 key_points = ?3, \
                 jurisdiction = COALESCE(?4, jurisdiction), \
                 impact = COALESCE(?5, impact), \
                 source_name = COALESCE(?6, source_name), \
                 published_date = COALESCE(?7, published_date), \
                 enrichment_status = ?8, \
                 last_enriched_at = ?9, \
                 updated_at = ?9 \
                 WHERE id = ?10 AND enrichment_status = ?11",
                || {
                    libsql::params![
                        enrichment.risk_area.as_deref(),
                        enrichment.summary.as_str(),
                        key_points.as_str(),
                        enrichment.jurisdiction.as_deref(),
                        enrichment.impact.map(docket_core::enums::ImpactLevel::as_str),
                        enrichment.source_name.as_deref(),
                        enrichment.published_date.as_deref(),
                        EnrichmentStatus::Completed.as_str(),
                        now.to_rfc3339(),
                        id,
                        EnrichmentStatus::InProgress.as_str()
                    ]
                },
            )
            .await?;
        if affected == 0 {
            return Err(DatabaseError::NotFound {
                entity_type: "public_source",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Mark an in-flight enrichment as failed and count the attempt. Failure
    /// is recorded only here; it is never surfaced to any caller.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::NotFound`] when the record vanished mid-flight.
    pub async fn fail_enrichment(&self, id: &str) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let affected = self
            .db()
            .execute_with(
                "UPDATE public_sources SET enrichment_status = ?1, \
                 enrichment_attempts = enrichment_attempts + 1, updated_at = ?2 \
                 WHERE id = ?3 AND enrichment_status = ?4",
                || {
                    libsql::params![
                        EnrichmentStatus::Failed.as_str(),
                        now.to_rfc3339(),
                        id,
                        EnrichmentStatus::InProgress.as_str()
                    ]
                },
            )
            .await?;
        if affected == 0 {
            return Err(DatabaseError::NotFound {
                entity_type: "public_source",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
