//! Shared application state.
//!
//! Built once in `main` from the loaded configuration and passed to every
//! handler behind an `Arc`; nothing reads configuration from ambient global
//! state.

use std::sync::Arc;

use docket_blob::BlobStore;
use docket_config::DocketConfig;
use docket_db::service::DocketService;
use docket_enrich::Enricher;

/// Object path prefix inside the internal documents bucket.
pub const INTERNAL_PREFIX: &str = "internal";
/// Object path prefix inside the attorney history bucket.
pub const HISTORY_PREFIX: &str = "attorney-history";

/// Everything handlers need: configuration, the store service, one blob
/// client per bucket, and the background enrichment pool.
pub struct AppState {
    pub config: DocketConfig,
    pub service: Arc<DocketService>,
    pub internal_docs: BlobStore,
    pub history_docs: BlobStore,
    /// `None` when the enrichment section is unconfigured; new sources then
    /// stay `pending` until enrichment is configured and triggered manually.
    pub enricher: Option<Enricher>,
}

impl AppState {
    /// Open the store, connect both buckets, and start the enrichment pool
    /// when it is configured.
    ///
    /// # Errors
    ///
    /// Fails when the blob section is missing required fields, the store
    /// cannot be opened, or a blob client cannot be built.
    pub async fn new(config: DocketConfig) -> anyhow::Result<Arc<Self>> {
        config.ensure_ready()?;

        let service = Arc::new(DocketService::from_config(&config.database).await?);
        let internal_docs = BlobStore::connect(&config.blob, &config.blob.internal_bucket)?;
        let history_docs = BlobStore::connect(&config.blob, &config.blob.history_bucket)?;

        let enricher = if config.enrichment.is_configured() {
            Some(Enricher::new(
                config.enrichment.clone(),
                Arc::clone(&service),
            ))
        } else {
            tracing::warn!("enrichment is not configured; new sources will stay pending");
            None
        };

        Ok(Arc::new(Self {
            config,
            service,
            internal_docs,
            history_docs,
            enricher,
        }))
    }

    /// Schedule background enrichment of one source when the pool is running.
    /// The caller never observes completion or failure.
    pub fn schedule_enrichment(&self, source_id: &str) {
        if let Some(ref enricher) = self.enricher {
            let _detached = enricher.spawn(source_id.to_string());
        }
    }
}

#[cfg(test)]
pub(crate) async fn test_state() -> Arc<AppState> {
    let mut config = DocketConfig::default();
    config.database.path = ":memory:".to_string();
    config.blob.endpoint = "https://storage.example.com".to_string();
    config.blob.access_key_id = "key".to_string();
    config.blob.secret_access_key = "secret".to_string();
    AppState::new(config).await.unwrap()
}
