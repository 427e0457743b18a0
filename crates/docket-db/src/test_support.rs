//! Shared test helpers.

use crate::service::DocketService;

/// In-memory service for repo tests.
pub(crate) async fn test_service() -> DocketService {
    DocketService::open_local(":memory:").await.unwrap()
}
