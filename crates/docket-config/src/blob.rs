//! Blob storage (S3-compatible) configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_region() -> String {
    String::from("auto")
}

fn default_internal_bucket() -> String {
    String::from("internal-docs")
}

fn default_history_bucket() -> String {
    String::from("attorney-history")
}

/// Default presigned URL lifetime: ten minutes.
const fn default_signed_url_ttl_secs() -> u64 {
    600
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlobConfig {
    /// S3-compatible endpoint URL.
    #[serde(default)]
    pub endpoint: String,

    /// Access key ID.
    #[serde(default)]
    pub access_key_id: String,

    /// Secret access key.
    #[serde(default)]
    pub secret_access_key: String,

    /// Region. S3-compatible stores without regions accept `auto`.
    #[serde(default = "default_region")]
    pub region: String,

    /// Bucket for internal documents.
    #[serde(default = "default_internal_bucket")]
    pub internal_bucket: String,

    /// Bucket for attorney history documents.
    #[serde(default = "default_history_bucket")]
    pub history_bucket: String,

    /// Presigned URL lifetime in seconds.
    #[serde(default = "default_signed_url_ttl_secs")]
    pub signed_url_ttl_secs: u64,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: default_region(),
            internal_bucket: default_internal_bucket(),
            history_bucket: default_history_bucket(),
            signed_url_ttl_secs: default_signed_url_ttl_secs(),
        }
    }
}

impl BlobConfig {
    /// Check if the blob config has the minimum required fields.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty()
            && !self.access_key_id.is_empty()
            && !self.secret_access_key.is_empty()
    }

    /// Presigned URL lifetime.
    #[must_use]
    pub const fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = BlobConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.internal_bucket, "internal-docs");
        assert_eq!(config.history_bucket, "attorney-history");
        assert_eq!(config.signed_url_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn configured_when_endpoint_and_keys_set() {
        let config = BlobConfig {
            endpoint: "https://storage.example.com".into(),
            access_key_id: "key".into(),
            secret_access_key: "secret".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn not_configured_when_missing_secret() {
        let config = BlobConfig {
            endpoint: "https://storage.example.com".into(),
            access_key_id: "key".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }
}
