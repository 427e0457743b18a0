//! # docket-api
//!
//! HTTP server for Docket: attorney profile and public data source CRUD,
//! bulk CSV upload, document storage with temporary links, and background
//! enrichment scheduling.
//!
//! Handlers validate request shapes, delegate to the store/blob/enrichment
//! crates, and map domain errors to HTTP statuses (see [`error::ApiError`]).
//! Requests are handled independently; store and blob I/O suspends only the
//! request that issued it.

pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{Method, header::CONTENT_TYPE};
use axum::routing::{get, patch, post};
use tokio::net::TcpListener;
use tokio::signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));
    let body_limit = state.config.server.max_upload_bytes();

    Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health))
        .route(
            "/api/v1/attorneys",
            post(routes::attorneys::create).get(routes::attorneys::list),
        )
        .route("/api/v1/attorneys/bulk", post(routes::attorneys::bulk))
        .route(
            "/api/v1/attorneys/{id}",
            get(routes::attorneys::get_one)
                .put(routes::attorneys::update)
                .delete(routes::attorneys::delete),
        )
        .route(
            "/api/v1/public-sources",
            post(routes::sources::create).get(routes::sources::list),
        )
        .route("/api/v1/public-sources/bulk", post(routes::sources::bulk))
        .route(
            "/api/v1/public-sources/{id}",
            get(routes::sources::get_one)
                .put(routes::sources::update)
                .delete(routes::sources::delete),
        )
        .route(
            "/api/v1/public-sources/{id}/enrich",
            patch(routes::sources::enrich),
        )
        .route("/upload/internal", post(routes::documents::upload_internal))
        .route(
            "/upload/attorney-history",
            post(routes::documents::upload_history),
        )
        .route("/list/internal", get(routes::documents::list_internal))
        .route(
            "/list/attorney-history",
            get(routes::documents::list_history),
        )
        .route("/files/{area}/{*path}", get(routes::documents::download))
        .route("/links/{area}/{*path}", get(routes::documents::link))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

/// Bind the configured address and serve until ctrl-c or SIGTERM.
///
/// # Errors
///
/// Fails when the address cannot be bound or the server errors out.
pub async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let address = state.config.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!(%address, "server running");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("failed to install ctrl-c handler");
        tracing::info!("received ctrl-c, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        tracing::info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
