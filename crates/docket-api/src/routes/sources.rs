//! Public data source endpoints.
//!
//! Creating a source schedules background enrichment; the response never
//! waits for it and enrichment failures are never surfaced here.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use docket_core::entities::{PublicSource, SourceDraft};
use docket_core::enums::EnrichmentStatus;
use docket_db::repos::source::SourceFilter;
use docket_db::updates::source::SourceUpdate;
use docket_ingest::parse_source_sheet;

use crate::error::ApiError;
use crate::routes::attorneys::{BulkResponse, Deleted};
use crate::routes::file_field;
use crate::state::AppState;

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<SourceDraft>,
) -> Result<(StatusCode, Json<PublicSource>), ApiError> {
    let draft = draft.validated().map_err(ApiError::Validation)?;
    let source = state.service.create_source(draft).await?;
    if source.enrichment_status == EnrichmentStatus::Pending {
        state.schedule_enrichment(&source.id);
    }
    Ok((StatusCode::CREATED, Json(source)))
}

#[derive(Debug, Default, Deserialize)]
pub struct SourceQuery {
    pub risk_area: Option<String>,
    pub jurisdiction: Option<String>,
    pub enrichment_status: Option<EnrichmentStatus>,
}

#[derive(Serialize)]
pub struct SourceList {
    pub count: usize,
    pub sources: Vec<PublicSource>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SourceQuery>,
) -> Result<Json<SourceList>, ApiError> {
    let filter = SourceFilter {
        risk_area: query.risk_area,
        jurisdiction: query.jurisdiction,
        enrichment_status: query.enrichment_status,
    };
    let sources = state.service.list_sources(&filter).await?;
    Ok(Json(SourceList {
        count: sources.len(),
        sources,
    }))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PublicSource>, ApiError> {
    Ok(Json(state.service.get_source(&id).await?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<SourceUpdate>,
) -> Result<Json<PublicSource>, ApiError> {
    let update = update.validated().map_err(ApiError::Validation)?;
    Ok(Json(state.service.update_source(&id, update).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    // The partition-scoped delete needs the stored jurisdiction.
    let source = state.service.get_source(&id).await?;
    state.service.delete_source(&id, &source.jurisdiction).await?;
    Ok(Json(Deleted { deleted: id }))
}

#[derive(Serialize)]
pub struct EnrichQueued {
    pub id: String,
    pub message: &'static str,
}

/// Manually queue (re-)enrichment of one source.
pub async fn enrich(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<EnrichQueued>), ApiError> {
    let source = state.service.get_source(&id).await?;
    if source.enrichment_status == EnrichmentStatus::Completed {
        return Err(ApiError::Conflict(format!("{id} is already enriched")));
    }
    let max_attempts = state.config.enrichment.max_attempts;
    if source.enrichment_attempts >= max_attempts {
        return Err(ApiError::BadRequest(format!(
            "{id} reached the maximum of {max_attempts} enrichment attempts"
        )));
    }
    if state.enricher.is_none() {
        return Err(ApiError::Unavailable(
            "enrichment is not configured".to_string(),
        ));
    }
    state.schedule_enrichment(&id);
    Ok((
        StatusCode::ACCEPTED,
        Json(EnrichQueued {
            id,
            message: "enrichment queued",
        }),
    ))
}

pub async fn bulk(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<BulkResponse>, ApiError> {
    let sheet = file_field(&mut multipart).await?;
    let outcome = parse_source_sheet(sheet.bytes.as_ref())?;
    let stored = state.service.bulk_create_sources(outcome.records).await?;
    for id in &stored.created_ids {
        // Rows seeded with a summary are already completed; the worker skips
        // them when it sees the status.
        state.schedule_enrichment(id);
    }
    tracing::info!(
        created = stored.created_ids.len(),
        row_errors = outcome.errors.len(),
        skipped = stored.skipped.len(),
        "source bulk upload"
    );
    Ok(Json(BulkResponse {
        created: stored.created_ids.len(),
        created_ids: stored.created_ids,
        row_errors: outcome.errors,
        skipped: stored.skipped,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use pretty_assertions::assert_eq;

    fn draft(title: &str) -> SourceDraft {
        SourceDraft {
            title: title.to_string(),
            url: "https://example.com/article".to_string(),
            source_name: None,
            published_date: None,
            risk_area: None,
            jurisdiction: None,
            summary: None,
            impact: None,
        }
    }

    #[tokio::test]
    async fn create_starts_pending() {
        let state = test_state().await;
        let (status, Json(source)) = create(State(state), Json(draft("Privacy ruling")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(source.enrichment_status, EnrichmentStatus::Pending);
    }

    #[tokio::test]
    async fn bad_url_is_a_validation_error() {
        let state = test_state().await;
        let mut bad = draft("Broken");
        bad.url = "ftp://example.com".to_string();
        let result = create(State(state), Json(bad)).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn enrich_completed_source_is_a_conflict() {
        let state = test_state().await;
        let mut seeded = draft("Done already");
        seeded.summary = Some("Pre-written.".to_string());
        let (_, Json(source)) = create(State(Arc::clone(&state)), Json(seeded)).await.unwrap();

        let result = enrich(State(state), Path(source.id)).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn enrich_without_pool_is_unavailable() {
        let state = test_state().await;
        let (_, Json(source)) = create(State(Arc::clone(&state)), Json(draft("Pending one")))
            .await
            .unwrap();

        let result = enrich(State(state), Path(source.id)).await;
        assert!(matches!(result, Err(ApiError::Unavailable(_))));
    }

    #[tokio::test]
    async fn enrich_missing_source_is_not_found() {
        let state = test_state().await;
        let result = enrich(State(state), Path("pds-00000000".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_the_source() {
        let state = test_state().await;
        let (_, Json(source)) = create(State(Arc::clone(&state)), Json(draft("Doomed")))
            .await
            .unwrap();

        delete(State(Arc::clone(&state)), Path(source.id.clone()))
            .await
            .unwrap();
        let result = get_one(State(state), Path(source.id)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_filters_by_enrichment_status() {
        let state = test_state().await;
        create(State(Arc::clone(&state)), Json(draft("Pending one")))
            .await
            .unwrap();
        let mut seeded = draft("Completed one");
        seeded.summary = Some("done".to_string());
        create(State(Arc::clone(&state)), Json(seeded)).await.unwrap();

        let query = SourceQuery {
            enrichment_status: Some(EnrichmentStatus::Completed),
            ..Default::default()
        };
        let Json(listing) = list(State(state), Query(query)).await.unwrap();
        assert_eq!(listing.count, 1);
        assert_eq!(listing.sources[0].title, "Completed one");
    }
}
