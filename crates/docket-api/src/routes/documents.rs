//! Document upload, listing, download, and temporary-link endpoints.
//!
//! Two areas map to two buckets: `internal` and `attorney-history`. Objects
//! land under the area's fixed prefix with a generated identifier in the name,
//! so repeated uploads of the same filename never collide.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use docket_blob::{BlobStore, object_name};

use crate::error::ApiError;
use crate::routes::file_field;
use crate::state::{AppState, HISTORY_PREFIX, INTERNAL_PREFIX};

fn store_for<'a>(state: &'a AppState, area: &str) -> Result<&'a BlobStore, ApiError> {
    match area {
        "internal" => Ok(&state.internal_docs),
        "attorney-history" => Ok(&state.history_docs),
        other => Err(ApiError::NotFound(format!("unknown document area: {other}"))),
    }
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub bucket: String,
    pub path: String,
    pub size: usize,
}

async fn upload_into(
    store: &BlobStore,
    prefix: &str,
    multipart: &mut Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let file = file_field(multipart).await?;
    let path = object_name(prefix, &file.filename)?;
    let size = file.bytes.len();
    store.upload(&path, file.bytes.to_vec()).await?;
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            bucket: store.bucket().to_string(),
            path,
            size,
        }),
    ))
}

pub async fn upload_internal(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    upload_into(&state.internal_docs, INTERNAL_PREFIX, &mut multipart).await
}

pub async fn upload_history(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    upload_into(&state.history_docs, HISTORY_PREFIX, &mut multipart).await
}

#[derive(Serialize)]
pub struct FileItem {
    pub path: String,
    pub size: u64,
    /// Presigned GET URL, valid for the configured TTL.
    pub url: String,
}

#[derive(Serialize)]
pub struct Listing {
    pub bucket: String,
    pub files: Vec<FileItem>,
}

async fn listing_for(store: &BlobStore, prefix: &str) -> Result<Json<Listing>, ApiError> {
    let entries = store.list(prefix).await?;
    let mut files = Vec::with_capacity(entries.len());
    for entry in entries {
        let url = store.signed_get_url(&entry.path).await?;
        files.push(FileItem {
            path: entry.path,
            size: entry.size,
            url,
        });
    }
    Ok(Json(Listing {
        bucket: store.bucket().to_string(),
        files,
    }))
}

pub async fn list_internal(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Listing>, ApiError> {
    listing_for(&state.internal_docs, INTERNAL_PREFIX).await
}

pub async fn list_history(State(state): State<Arc<AppState>>) -> Result<Json<Listing>, ApiError> {
    listing_for(&state.history_docs, HISTORY_PREFIX).await
}

pub async fn download(
    State(state): State<Arc<AppState>>,
    Path((area, path)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let store = store_for(&state, &area)?;
    let bytes = store.download(&path).await?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    )
        .into_response())
}

#[derive(Serialize)]
pub struct TemporaryLink {
    pub url: String,
    pub expires_in_secs: u64,
}

pub async fn link(
    State(state): State<Arc<AppState>>,
    Path((area, path)): Path<(String, String)>,
) -> Result<Json<TemporaryLink>, ApiError> {
    let store = store_for(&state, &area)?;
    let url = store.signed_get_url(&path).await?;
    Ok(Json(TemporaryLink {
        url,
        expires_in_secs: store.signed_url_ttl().as_secs(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn unknown_area_is_not_found() {
        let state = test_state().await;
        let result = store_for(&state, "secrets");
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn areas_resolve_to_their_buckets() {
        let state = test_state().await;
        assert_eq!(store_for(&state, "internal").unwrap().bucket(), "internal-docs");
        assert_eq!(
            store_for(&state, "attorney-history").unwrap().bucket(),
            "attorney-history"
        );
    }

    #[tokio::test]
    async fn links_carry_the_configured_ttl() {
        let state = test_state().await;
        // Presigning is local: no network round-trip, so the URL and its
        // expiry can be checked without a live store.
        let Json(link) = link(
            State(state),
            Path(("internal".to_string(), "internal/abc_brief.pdf".to_string())),
        )
        .await
        .unwrap();
        assert_eq!(link.expires_in_secs, 600);
        assert!(link.url.contains("internal/abc_brief.pdf"));
    }
}
