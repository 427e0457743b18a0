//! Blob storage error types.

/// Errors that can occur in the blob storage layer.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// Requested object does not exist.
    #[error("Blob not found: {path}")]
    NotFound {
        /// Object path within the bucket.
        path: String,
    },

    /// A name could not be turned into a safe object path.
    #[error("Invalid blob name: {0}")]
    InvalidName(String),

    /// Underlying object store operation failed.
    #[error("Object store error: {0}")]
    Store(#[from] object_store::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
