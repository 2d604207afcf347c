use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Plain 404, in JSON for clients that ask for it.
///
/// Every refusal that must not reveal whether an asset exists ends here.
pub async fn not_found_handler(headers: HeaderMap) -> Response {
    not_found(&headers)
}

pub(crate) fn not_found(headers: &HeaderMap) -> Response {
    let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());

    let mut response = match accept {
        Some(accept_str) if accept_str.contains("application/json") => {
            let err_msg = serde_json::json!({"msg": "not found"});
            (StatusCode::NOT_FOUND, Json(err_msg)).into_response()
        }
        _ => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            "not found",
        )
            .into_response(),
    };
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, header::HeaderValue::from_static("no-store"));
    response
}
