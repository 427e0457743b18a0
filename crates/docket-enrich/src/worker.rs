//! Bounded background worker pool.
//!
//! Every created source is enriched by a detached task gated by a semaphore of
//! `workers` permits, so a bulk upload of N rows never runs N concurrent
//! external calls. Each task drives one record through the status machine:
//! `begin_enrichment`, up to `max_attempts` fetch+summarize attempts with
//! exponential backoff, then `complete_enrichment` or `fail_enrichment`. A
//! record deleted while its call is in flight has the result discarded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use docket_config::EnrichmentConfig;
use docket_core::entities::SourceEnrichment;
use docket_db::error::DatabaseError;
use docket_db::service::DocketService;

use crate::client::EnrichmentClient;
use crate::error::EnrichError;

/// Per-record retry policy: attempt count and backoff bounds.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts per record, including the initial one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Backoff cap.
    pub max_delay: Duration,
}

impl RetryPolicy {
    fn from_config(config: &EnrichmentConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Delay before the retry that follows the given 1-based failed attempt:
    /// `base_delay` doubling per attempt, capped at `max_delay`.
    fn delay_after(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(2u32.saturating_pow(doublings))
            .min(self.max_delay)
    }
}

/// Schedules and runs background enrichment of public sources.
pub struct Enricher {
    client: Arc<EnrichmentClient>,
    service: Arc<DocketService>,
    permits: Arc<Semaphore>,
    policy: RetryPolicy,
}

impl Enricher {
    /// Build an enricher over the shared store service.
    #[must_use]
    pub fn new(config: EnrichmentConfig, service: Arc<DocketService>) -> Self {
        let policy = RetryPolicy::from_config(&config);
        let workers = config.workers.max(1);
        Self {
            client: Arc::new(EnrichmentClient::new(config)),
            service,
            permits: Arc::new(Semaphore::new(workers)),
            policy,
        }
    }

    /// Schedule enrichment of one source as a detached task.
    ///
    /// Returns immediately; the task waits for a worker permit, so callers can
    /// schedule any number of records without running more than `workers`
    /// external calls at once. The handle is only awaited by tests — callers
    /// never observe completion or failure.
    pub fn spawn(&self, source_id: impl Into<String>) -> JoinHandle<()> {
        let id = source_id.into();
        let client = Arc::clone(&self.client);
        let service = Arc::clone(&self.service);
        let permits = Arc::clone(&self.permits);
        let policy = self.policy.clone();
        tokio::spawn(async move {
            let Ok(_permit) = permits.acquire().await else {
                return;
            };
            enrich_one(&client, &service, &policy, &id).await;
        })
    }

    /// The retry policy tasks run with.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

/// Drive one record through the status machine. Never returns an error: every
/// failure ends up in the record's status field and a log line, nowhere else.
async fn enrich_one(
    client: &EnrichmentClient,
    service: &DocketService,
    policy: &RetryPolicy,
    id: &str,
) {
    let source = match service.begin_enrichment(id).await {
        Ok(source) => source,
        Err(DatabaseError::InvalidState(reason)) => {
            tracing::debug!(%id, %reason, "skipping enrichment");
            return;
        }
        Err(DatabaseError::NotFound { .. }) => {
            tracing::debug!(%id, "source deleted before enrichment started");
            return;
        }
        Err(e) => {
            tracing::warn!(%id, error = %e, "could not begin enrichment");
            return;
        }
    };

    match summarize_with_retry(client, policy, &source.title, &source.url).await {
        Ok(enrichment) => match service.complete_enrichment(id, &enrichment).await {
            Ok(()) => tracing::info!(%id, "enrichment completed"),
            Err(DatabaseError::NotFound { .. }) => {
                // Deleted (or concurrently transitioned) mid-flight; the late
                // result must not resurrect the record.
                tracing::warn!(%id, "source vanished mid-enrichment; discarding result");
            }
            Err(e) => tracing::warn!(%id, error = %e, "could not store enrichment result"),
        },
        Err(last_error) => {
            tracing::warn!(
                %id,
                attempts = policy.max_attempts,
                error = %last_error,
                "enrichment attempts exhausted"
            );
            match service.fail_enrichment(id).await {
                Ok(()) | Err(DatabaseError::NotFound { .. }) => {}
                Err(e) => tracing::warn!(%id, error = %e, "could not record enrichment failure"),
            }
        }
    }
}

async fn summarize_with_retry(
    client: &EnrichmentClient,
    policy: &RetryPolicy,
    title: &str,
    url: &str,
) -> Result<SourceEnrichment, EnrichError> {
    let mut attempt = 1;
    loop {
        match summarize_once(client, title, url).await {
            Ok(enrichment) => return Ok(enrichment),
            Err(error) => {
                if attempt >= policy.max_attempts {
                    return Err(error);
                }
                let delay = policy.delay_after(attempt);
                tracing::debug!(
                    attempt,
                    ?delay,
                    error = %error,
                    "enrichment attempt failed; backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

async fn summarize_once(
    client: &EnrichmentClient,
    title: &str,
    url: &str,
) -> Result<SourceEnrichment, EnrichError> {
    let content = client.fetch_page(url).await?;
    client.summarize(title, url, &content).await
}
