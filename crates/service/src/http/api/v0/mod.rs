use axum::routing::{get, patch, post};
use axum::Router;

pub mod assets;
pub mod content;
pub mod rules;

use crate::ServiceState;

/// Editor-only routes. Every write here ends in a rule regeneration.
pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/content", post(content::create))
        .route("/content/:id", patch(content::update))
        .route("/assets", post(assets::create))
        .route("/assets/:id", get(assets::get).patch(assets::update))
        .route("/rules", get(rules::handler))
        .with_state(state)
}
