//! Domain-error to HTTP status mapping.
//!
//! Validation failures answer 422, missing records 404, duplicate writes and
//! disallowed transitions 409, transient store trouble 503, everything else
//! 500 with the detail kept to the log. A failed request never affects other
//! in-flight requests.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use docket_blob::BlobError;
use docket_db::error::DatabaseError;
use docket_ingest::IngestError;

/// Client-facing error for every route handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request shape or field values failed validation.
    #[error("validation failed")]
    Validation(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    /// A backing service is temporarily unavailable.
    #[error("{0}")]
    Unavailable(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: "validation failed".to_string(),
                    details,
                },
            ),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, ErrorBody::from(message)),
            Self::Conflict(message) => (StatusCode::CONFLICT, ErrorBody::from(message)),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, ErrorBody::from(message)),
            Self::Unavailable(message) => {
                (StatusCode::SERVICE_UNAVAILABLE, ErrorBody::from(message))
            }
            Self::Internal(error) => {
                tracing::error!(error = %error, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::from("internal server error".to_string()),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<String> for ErrorBody {
    fn from(error: String) -> Self {
        Self {
            error,
            details: Vec::new(),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound { entity_type, id } => {
                Self::NotFound(format!("{entity_type} {id} not found"))
            }
            DatabaseError::Conflict(message) => Self::Conflict(message),
            DatabaseError::InvalidState(message) => Self::Conflict(message),
            DatabaseError::Transient(message) => Self::Unavailable(message),
            other => Self::Internal(other.into()),
        }
    }
}

impl From<BlobError> for ApiError {
    fn from(error: BlobError) -> Self {
        match error {
            BlobError::NotFound { path } => Self::NotFound(format!("object {path} not found")),
            BlobError::InvalidName(name) => {
                Self::Validation(vec![format!("unusable filename: {name}")])
            }
            other => Self::Internal(other.into()),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(error: IngestError) -> Self {
        match error {
            IngestError::MissingColumns(_) => Self::Validation(vec![error.to_string()]),
            IngestError::Read(e) => Self::BadRequest(format!("unreadable sheet: {e}")),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        Self::BadRequest(format!("malformed multipart upload: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: ApiError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            status_of(ApiError::Validation(vec!["name is required".into()])),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(ApiError::NotFound("gone".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Conflict("duplicate".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApiError::Unavailable("store down".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(ApiError::Internal(anyhow::anyhow!("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn database_errors_map_by_kind() {
        let not_found = DatabaseError::NotFound {
            entity_type: "attorney",
            id: "att-12ab34cd".into(),
        };
        assert_eq!(status_of(not_found.into()), StatusCode::NOT_FOUND);

        let conflict = DatabaseError::Conflict("UNIQUE constraint failed".into());
        assert_eq!(status_of(conflict.into()), StatusCode::CONFLICT);

        let busy = DatabaseError::Transient("database table is locked".into());
        assert_eq!(status_of(busy.into()), StatusCode::SERVICE_UNAVAILABLE);

        let invalid = DatabaseError::InvalidState("already completed".into());
        assert_eq!(status_of(invalid.into()), StatusCode::CONFLICT);
    }

    #[test]
    fn blob_errors_map_by_kind() {
        let missing = BlobError::NotFound {
            path: "internal/x.pdf".into(),
        };
        assert_eq!(status_of(missing.into()), StatusCode::NOT_FOUND);

        let bad_name = BlobError::InvalidName("///".into());
        assert_eq!(status_of(bad_name.into()), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn missing_columns_are_a_validation_failure() {
        let error = IngestError::MissingColumns(vec!["name".into(), "seniority".into()]);
        let api: ApiError = error.into();
        assert_eq!(status_of(api), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
