//! Attorney profile endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use docket_core::entities::{AttorneyDraft, AttorneyProfile};
use docket_core::enums::Seniority;
use docket_db::repos::SkippedRecord;
use docket_db::repos::attorney::AttorneyFilter;
use docket_db::updates::attorney::AttorneyUpdate;
use docket_ingest::{RowError, parse_attorney_sheet};

use crate::error::ApiError;
use crate::routes::file_field;
use crate::state::AppState;

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<AttorneyDraft>,
) -> Result<(StatusCode, Json<AttorneyProfile>), ApiError> {
    let draft = draft.validated().map_err(ApiError::Validation)?;
    let profile = state.service.create_attorney(draft).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[derive(Debug, Default, Deserialize)]
pub struct AttorneyQuery {
    pub practice_area: Option<String>,
    pub seniority: Option<Seniority>,
    pub min_experience: Option<u32>,
}

#[derive(Serialize)]
pub struct AttorneyList {
    pub count: usize,
    pub attorneys: Vec<AttorneyProfile>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AttorneyQuery>,
) -> Result<Json<AttorneyList>, ApiError> {
    let filter = AttorneyFilter {
        practice_area: query.practice_area,
        seniority: query.seniority,
        min_experience: query.min_experience,
    };
    let attorneys = state.service.list_attorneys(&filter).await?;
    Ok(Json(AttorneyList {
        count: attorneys.len(),
        attorneys,
    }))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AttorneyProfile>, ApiError> {
    Ok(Json(state.service.get_attorney(&id).await?))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<AttorneyUpdate>,
) -> Result<Json<AttorneyProfile>, ApiError> {
    let update = update.validated().map_err(ApiError::Validation)?;
    Ok(Json(state.service.update_attorney(&id, update).await?))
}

#[derive(Serialize)]
pub struct Deleted {
    pub deleted: String,
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    // The partition-scoped delete needs the stored seniority.
    let profile = state.service.get_attorney(&id).await?;
    state.service.delete_attorney(&id, profile.seniority).await?;
    Ok(Json(Deleted { deleted: id }))
}

/// Bulk upload response: per-row validation errors from the sheet plus rows
/// the store refused (duplicate emails). Neither blocks the other rows.
#[derive(Serialize)]
pub struct BulkResponse {
    pub created: usize,
    pub created_ids: Vec<String>,
    pub row_errors: Vec<RowError>,
    pub skipped: Vec<SkippedRecord>,
}

pub async fn bulk(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<BulkResponse>, ApiError> {
    let sheet = file_field(&mut multipart).await?;
    let outcome = parse_attorney_sheet(sheet.bytes.as_ref())?;
    let stored = state.service.bulk_create_attorneys(outcome.records).await?;
    tracing::info!(
        created = stored.created_ids.len(),
        row_errors = outcome.errors.len(),
        skipped = stored.skipped.len(),
        "attorney bulk upload"
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
    use docket_core::entities::PracticeArea;
    use docket_core::enums::Proficiency;
    use docket_db::updates::attorney::AttorneyUpdateBuilder;
    use pretty_assertions::assert_eq;

    fn draft(name: &str, email: &str) -> AttorneyDraft {
        AttorneyDraft {
            name: name.to_string(),
            email: Some(email.to_string()),
            seniority: Seniority::Partner,
            years_of_experience: 15,
            practice_areas: vec![PracticeArea {
                area: "Tax".to_string(),
                proficiency: Proficiency::Expert,
                years_in_practice: 12,
            }],
            major_cases: Vec::new(),
            jurisdictions: vec!["United States".to_string()],
        }
    }

    #[tokio::test]
    async fn create_then_get_roundtrip() {
        let state = test_state().await;
        let (status, Json(profile)) = create(
            State(Arc::clone(&state)),
            Json(draft("Jane Doe", "jane@firm.example")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(fetched) = get_one(State(state), Path(profile.id.clone())).await.unwrap();
        assert_eq!(fetched, profile);
    }

    #[tokio::test]
    async fn invalid_draft_is_a_validation_error() {
        let state = test_state().await;
        let mut bad = draft("Jane Doe", "jane@firm.example");
        bad.jurisdictions = Vec::new();
        let result = create(State(state), Json(bad)).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let state = test_state().await;
        create(
            State(Arc::clone(&state)),
            Json(draft("Jane Doe", "shared@firm.example")),
        )
        .await
        .unwrap();
        let result = create(State(state), Json(draft("John Roe", "shared@firm.example"))).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let state = test_state().await;
        let result = get_one(State(state), Path("att-00000000".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let state = test_state().await;
        let result = delete(State(state), Path("att-00000000".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_the_profile() {
        let state = test_state().await;
        let (_, Json(profile)) = create(
            State(Arc::clone(&state)),
            Json(draft("Jane Doe", "jane@firm.example")),
        )
        .await
        .unwrap();

        delete(State(Arc::clone(&state)), Path(profile.id.clone()))
            .await
            .unwrap();
        let result = get_one(State(state), Path(profile.id)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_changes_only_provided_fields() {
        let state = test_state().await;
        let (_, Json(profile)) = create(
            State(Arc::clone(&state)),
            Json(draft("Jane Doe", "jane@firm.example")),
        )
        .await
        .unwrap();

        let patch = AttorneyUpdateBuilder::new().years_of_experience(20).build();
        let Json(updated) = update(State(state), Path(profile.id), Json(patch))
            .await
            .unwrap();
        assert_eq!(updated.years_of_experience, 20);
        assert_eq!(updated.name, "Jane Doe");
    }

    #[tokio::test]
    async fn list_filters_by_seniority() {
        let state = test_state().await;
        create(
            State(Arc::clone(&state)),
            Json(draft("Jane Doe", "jane@firm.example")),
        )
        .await
        .unwrap();
        let mut junior = draft("New Hire", "hire@firm.example");
        junior.seniority = Seniority::Associate;
        junior.years_of_experience = 1;
        junior.practice_areas = Vec::new();
        create(State(Arc::clone(&state)), Json(junior)).await.unwrap();

        let query = AttorneyQuery {
            seniority: Some(Seniority::Partner),
            ..Default::default()
        };
        let Json(listing) = list(State(state), Query(query)).await.unwrap();
        assert_eq!(listing.count, 1);
        assert_eq!(listing.attorneys[0].name, "Jane Doe");
    }
}
