//! Route handlers, one module per resource.

pub mod attorneys;
pub mod documents;
pub mod health;
pub mod sources;

use axum::body::Bytes;
use axum::extract::Multipart;

use crate::error::ApiError;

/// One file pulled out of a multipart upload.
pub(crate) struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Read the first multipart field that carries a filename.
pub(crate) async fn file_field(multipart: &mut Multipart) -> Result<UploadedFile, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        let Some(filename) = field.file_name().map(ToString::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?;
        return Ok(UploadedFile { filename, bytes });
    }
    Err(ApiError::BadRequest(
        "multipart upload must carry a file field".to_string(),
    ))
}
