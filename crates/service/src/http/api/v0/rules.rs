use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;

use common::rules::RuleSet;

use crate::http::requester::Editor;
use crate::ServiceState;

#[derive(Debug, Serialize)]
pub struct RulesResponse {
    #[serde(flatten)]
    pub rules: RuleSet,
    pub rewrite_block: String,
    pub crawler_exclusions: Vec<String>,
}

/// The rule set as it would be written right now
pub async fn handler(
    _editor: Editor,
    State(state): State<ServiceState>,
) -> Result<Json<RulesResponse>, RulesError> {
    let rules = state
        .gate()
        .generate_rules()
        .await
        .map_err(|e| RulesError::Listing(e.to_string()))?;

    Ok(Json(RulesResponse {
        rewrite_block: rules.rewrite_block(),
        crawler_exclusions: rules.crawler_exclusions(),
        rules,
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to list protected assets: {0}")]
    Listing(String),
}

impl IntoResponse for RulesError {
    fn into_response(self) -> Response {
        tracing::error!("RULES API ERROR: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
