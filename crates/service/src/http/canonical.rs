use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use common::request::Request as GateRequest;

use crate::ServiceState;

/// Canonicalise the gated endpoint's path to the site root, unless the
///  request is a gated download the rewrite rules sent here.
pub async fn middleware(
    State(state): State<ServiceState>,
    request: Request,
    next: Next,
) -> Response {
    let endpoint = state.gate().endpoint();
    if request.method() != Method::GET || endpoint == "/" || request.uri().path() != endpoint {
        return next.run(request).await;
    }

    let query = request.uri().query();
    let canonical = match query {
        Some(q) if !q.is_empty() => format!("/?{}", q),
        _ => "/".to_string(),
    };
    let gate_request = GateRequest::from_query(query.unwrap_or(""));

    match state.gate().canonical_redirect(&gate_request, Some(canonical)) {
        Some(location) => {
            tracing::debug!(%location, "canonical redirect");
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
        }
        None => next.run(request).await,
    }
}
