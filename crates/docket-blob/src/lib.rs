//! # docket-blob
//!
//! S3-compatible blob storage client for Docket.
//!
//! One [`BlobStore`] per bucket: uploads, downloads, non-streaming listings,
//! and time-limited presigned GET URLs. Objects are stored under
//! `<prefix>/<generated-id>_<filename>` so repeated uploads of the same
//! filename never collide. No versioning or deduplication.

mod error;

pub use error::BlobError;

use std::time::Duration;

use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::{ObjectStore, PutPayload};
use uuid::Uuid;

use docket_config::BlobConfig;

/// One listed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    /// Full object path within the bucket (e.g., `internal/doc-..._brief.pdf`).
    pub path: String,
    pub size: u64,
}

/// Client for a single bucket of an S3-compatible store.
pub struct BlobStore {
    store: AmazonS3,
    bucket: String,
    signed_url_ttl: Duration,
}

impl BlobStore {
    /// Connect to one bucket using the shared blob configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Store`] when the client cannot be built from the
    /// configuration.
    pub fn connect(config: &BlobConfig, bucket: &str) -> Result<Self, BlobError> {
        let mut builder = AmazonS3Builder::new()
            .with_endpoint(config.endpoint.clone())
            .with_region(config.region.clone())
            .with_bucket_name(bucket)
            .with_access_key_id(config.access_key_id.clone())
            .with_secret_access_key(config.secret_access_key.clone())
            .with_virtual_hosted_style_request(false);
        if config.endpoint.starts_with("http://") {
            builder = builder.with_allow_http(true);
        }
        let store = builder.build()?;
        Ok(Self {
            store,
            bucket: bucket.to_string(),
            signed_url_ttl: config.signed_url_ttl(),
        })
    }

    /// Bucket this client writes to.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload an object, overwriting any existing one at the same path.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Store`] when the upload fails.
    pub async fn upload(&self, path: &str, data: Vec<u8>) -> Result<(), BlobError> {
        let location = Path::from(path);
        self.store
            .put(&location, PutPayload::from(data))
            .await?;
        tracing::debug!(bucket = %self.bucket, %path, "uploaded blob");
        Ok(())
    }

    /// Download an object's bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::NotFound`] when the object does not exist.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, BlobError> {
        let location = Path::from(path);
        let result = self.store.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => BlobError::NotFound {
                path: path.to_string(),
            },
            other => BlobError::Store(other),
        })?;
        let bytes = result.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// List objects directly under a prefix.
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Store`] when the listing fails.
    pub async fn list(&self, prefix: &str) -> Result<Vec<BlobEntry>, BlobError> {
        let prefix_path = Path::from(prefix);
        let listing = self.store.list_with_delimiter(Some(&prefix_path)).await?;
        Ok(listing
            .objects
            .into_iter()
            .map(|meta| BlobEntry {
                path: meta.location.to_string(),
                size: meta.size,
            })
            .collect())
    }

    /// Mint a presigned GET URL for an object, valid for the configured TTL
    /// (after which access fails at the backing store).
    ///
    /// # Errors
    ///
    /// Returns [`BlobError::Store`] when signing fails.
    pub async fn signed_get_url(&self, path: &str) -> Result<String, BlobError> {
        let location = Path::from(path);
        let url = self
            .store
            .signed_url(http::Method::GET, &location, self.signed_url_ttl)
            .await?;
        Ok(url.to_string())
    }

    /// Presigned URL lifetime this store was configured with.
    #[must_use]
    pub const fn signed_url_ttl(&self) -> Duration {
        self.signed_url_ttl
    }
}

/// Build a collision-free object path: `<prefix>/<generated-id>_<filename>`.
///
/// The filename is sanitized to a safe character set; a name that sanitizes to
/// nothing is rejected.
///
/// # Errors
///
/// Returns [`BlobError::InvalidName`] for empty or fully-stripped filenames.
pub fn object_name(prefix: &str, filename: &str) -> Result<String, BlobError> {
    let safe = sanitize_segment(filename);
    if safe == "_" {
        return Err(BlobError::InvalidName(filename.to_string()));
    }
    Ok(format!("{prefix}/{}_{safe}", Uuid::new_v4()))
}

fn sanitize_segment(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_underscore = false;

    for ch in input.chars() {
        let keep = ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' || ch == '_';
        if keep {
            out.push(ch);
            prev_underscore = false;
        } else if !prev_underscore {
            out.push('_');
            prev_underscore = true;
        }
    }

    let sanitized = out.trim_matches('_');
    if sanitized.is_empty() {
        return "_".to_string();
    }

    let mut capped = sanitized.to_string();
    if capped.len() > 128 {
        capped.truncate(128);
    }
    capped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_name_keeps_prefix_and_extension() {
        let name = object_name("internal", "Quarterly Brief.pdf").unwrap();
        assert!(name.starts_with("internal/"));
        assert!(name.ends_with("_Quarterly_Brief.pdf"));
    }

    #[test]
    fn object_name_is_collision_free() {
        let a = object_name("internal", "brief.pdf").unwrap();
        let b = object_name("internal", "brief.pdf").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn object_name_rejects_unusable_filenames() {
        assert!(matches!(
            object_name("internal", "///"),
            Err(BlobError::InvalidName(_))
        ));
        assert!(matches!(
            object_name("internal", ""),
            Err(BlobError::InvalidName(_))
        ));
    }

    #[test]
    fn sanitize_collapses_runs_and_caps_length() {
        assert_eq!(sanitize_segment("a  b!!c"), "a_b_c");
        assert_eq!(sanitize_segment("__edge__"), "edge");
        let long = "x".repeat(200);
        assert_eq!(sanitize_segment(&long).len(), 128);
    }

    #[test]
    fn connect_requires_no_network() {
        let config = BlobConfig {
            endpoint: "https://storage.example.com".into(),
            access_key_id: "key".into(),
            secret_access_key: "secret".into(),
            ..Default::default()
        };
        let store = BlobStore::connect(&config, "internal-docs").unwrap();
        assert_eq!(store.bucket(), "internal-docs");
        assert_eq!(store.signed_url_ttl(), Duration::from_secs(600));
    }
}
