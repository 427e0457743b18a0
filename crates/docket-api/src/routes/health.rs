//! Service banner and health check.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Banner {
    service: &'static str,
    version: &'static str,
    health: &'static str,
}

pub async fn root() -> Json<Banner> {
    Json(Banner {
        service: "Docket legal data API",
        version: env!("CARGO_PKG_VERSION"),
        health: "/health",
    })
}

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    database: String,
    buckets: Buckets,
}

#[derive(Serialize)]
pub struct Buckets {
    internal: String,
    attorney_history: String,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    let database = if state.config.database.is_remote() {
        state.config.database.url.clone()
    } else {
        state.config.database.path.clone()
    };
    Json(Health {
        status: "healthy",
        database,
        buckets: Buckets {
            internal: state.internal_docs.bucket().to_string(),
            attorney_history: state.history_docs.bucket().to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    #[tokio::test]
    async fn health_names_database_and_buckets() {
        let state = test_state().await;
        let Json(health) = health(State(state)).await;
        assert_eq!(health.status, "healthy");
        assert_eq!(health.database, ":memory:");
        assert_eq!(health.buckets.internal, "internal-docs");
        assert_eq!(health.buckets.attorney_history, "attorney-history");
    }
}
