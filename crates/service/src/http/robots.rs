use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::ServiceState;

/// robots.txt with a `Disallow` line for every protected asset
#[tracing::instrument(skip_all)]
pub async fn handler(State(state): State<ServiceState>) -> Response {
    let base = &state.config().robots_base;
    let body = match state.gate().generate_rules().await {
        Ok(rules) => rules.robots_txt(base),
        Err(e) => {
            tracing::warn!("failed to list protected assets for robots.txt: {}", e);
            format!("{}\n", base.trim_end())
        }
    };

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}
