//! HTTP surface of the gate: the gated endpoint, robots.txt, the
//! editor API and health checks.

use axum::routing::get;
use axum::{middleware, Router};
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse};
use tower_http::LatencyUnit;

pub mod api;
mod canonical;
mod download;
mod handlers;
pub mod health;
pub mod requester;
mod robots;

pub use handlers::not_found_handler;

use crate::ServiceState;

const API_PREFIX: &str = "/api";
const STATUS_PREFIX: &str = "/_status";

/// All routes, without transport concerns like tracing
pub fn router(state: ServiceState) -> Router {
    let download_routes = get(download::handler).post(download::submit_password);
    let endpoint = state.gate().endpoint().to_string();

    let router = Router::new().route("/", download_routes.clone());
    let router = if endpoint != "/" {
        router.route(&endpoint, download_routes)
    } else {
        router
    };

    router
        .route("/robots.txt", get(robots::handler))
        .nest(STATUS_PREFIX, health::router(state.clone()))
        .nest(API_PREFIX, api::router(state.clone()))
        .fallback(handlers::not_found_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            canonical::middleware,
        ))
        .with_state(state)
}

/// Serve until `shutdown_rx` fires
pub async fn run(
    state: ServiceState,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    let listen_addr = state.config().listen_addr();
    let log_level = state.config().log_level();
    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    let router = router(state).layer(trace_layer);

    tracing::info!(addr = ?listen_addr, "media gate listening");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("an error occurred running the HTTP server: {0}")]
    ServingFailed(#[from] std::io::Error),
}
