use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

#[tracing::instrument]
pub async fn handler() -> Response {
    let msg = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(msg)).into_response()
}
