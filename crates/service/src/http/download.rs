use std::path::{Component, Path, PathBuf};

use askama::Template;
use axum::extract::{Form, RawQuery, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use common::access::Requester;
use common::gate::{Delivery, Listing, Refusal, StampedAsset};
use common::prelude::Asset;
use common::request::{gated_target, Request as GateRequest};

use super::handlers::not_found;
use super::requester::{password_cookie, Authorized};
use crate::ServiceState;

#[derive(Template)]
#[template(path = "password_prompt.html")]
struct PasswordPrompt {
    action: String,
    failed: bool,
}

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    pub post_password: String,
}

/// The gated endpoint. Streams the asset named in the query when the
///  requester may have it; otherwise falls back to what the platform
///  would render for an empty listing.
#[tracing::instrument(skip_all)]
pub async fn handler(
    State(state): State<ServiceState>,
    Authorized(requester): Authorized,
    request: Request,
) -> Response {
    let query = GateRequest::from_query(request.uri().query().unwrap_or(""));
    let headers = request.headers().clone();

    let Some(delivery) = state.gate().deliver_request(&query, &requester).await else {
        return not_found(&headers);
    };

    match delivery {
        Delivery::File(asset) => serve_file(&state, &asset, request).await,
        Delivery::Refused(Refusal::NotFound) => not_found(&headers),
        Delivery::Refused(Refusal::Unauthorized {
            asset,
            classification,
        }) => {
            // the listing only decides whether the asset may be shown at all
            let listing = state
                .gate()
                .filter_listing(Listing::not_found(), &query, &requester)
                .await;
            if listing.items.is_empty() {
                return not_found(&headers);
            }
            let stamped = StampedAsset {
                asset,
                classification,
            };
            render_prompt(&state, &stamped, &requester, &headers)
        }
    }
}

/// Accept a passphrase from the prompt, remember it in a cookie and send
///  the browser back to the file.
#[tracing::instrument(skip_all)]
pub async fn submit_password(
    State(state): State<ServiceState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    Form(form): Form<PasswordForm>,
) -> Response {
    let query = GateRequest::from_query(query.as_deref().unwrap_or(""));
    let Some(id) = query.attachment_id() else {
        return not_found(&headers);
    };

    tracing::info!(asset_id = id, "password submitted");
    (
        StatusCode::SEE_OTHER,
        [
            (header::SET_COOKIE, password_cookie(&form.post_password)),
            (header::LOCATION, gated_target(state.gate().endpoint(), id)),
        ],
    )
        .into_response()
}

async fn serve_file(state: &ServiceState, asset: &Asset, request: Request) -> Response {
    let headers = request.headers().clone();
    let Some(path) = resolve_storage_path(&state.config().uploads_dir, &asset.storage_path) else {
        tracing::warn!(
            asset_id = asset.id,
            storage_path = %asset.storage_path,
            "refusing storage path outside the uploads directory"
        );
        return not_found(&headers);
    };

    let mime: mime_guess::mime::Mime = asset
        .mime_type
        .parse()
        .unwrap_or(mime_guess::mime::APPLICATION_OCTET_STREAM);
    let mut response = match ServeFile::new_with_mime(&path, &mime).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(infallible) => match infallible {},
    };

    if response.status() == StatusCode::NOT_FOUND {
        tracing::warn!(asset_id = asset.id, path = %path.display(), "asset file is missing");
        return not_found(&headers);
    }
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn render_prompt(
    state: &ServiceState,
    stamped: &StampedAsset,
    requester: &Requester,
    headers: &HeaderMap,
) -> Response {
    if !stamped.password_required(requester) {
        return not_found(headers);
    }

    let prompt = PasswordPrompt {
        action: gated_target(state.gate().endpoint(), stamped.asset.id),
        failed: requester.supplied_password().is_some(),
    };
    match prompt.render() {
        Ok(body) => (
            StatusCode::UNAUTHORIZED,
            [(header::CACHE_CONTROL, "no-store")],
            Html(body),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to render password prompt: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Join a storage path onto the uploads directory, refusing anything that
///  would step outside it
fn resolve_storage_path(root: &Path, storage_path: &str) -> Option<PathBuf> {
    let relative = Path::new(storage_path.trim_start_matches('/'));
    if relative.as_os_str().is_empty() {
        return None;
    }
    let contained = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    contained.then(|| root.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_storage_path() {
        let root = Path::new("/srv/uploads");
        assert_eq!(
            resolve_storage_path(root, "2024/01/a.png"),
            Some(PathBuf::from("/srv/uploads/2024/01/a.png"))
        );
        assert_eq!(
            resolve_storage_path(root, "/2024/a.png"),
            Some(PathBuf::from("/srv/uploads/2024/a.png"))
        );
        assert_eq!(resolve_storage_path(root, "../secrets.txt"), None);
        assert_eq!(resolve_storage_path(root, "2024/../../etc/passwd"), None);
        assert_eq!(resolve_storage_path(root, ""), None);
        assert_eq!(resolve_storage_path(root, "/"), None);
    }

    #[test]
    fn test_prompt_escapes_action() {
        let prompt = PasswordPrompt {
            action: "/index.php?hl_download=1&attachment_id=3".to_string(),
            failed: true,
        };
        let html = prompt.render().unwrap();
        assert!(html.contains("attachment_id=3"));
        assert!(html.contains("&amp;"));
        assert!(html.contains("incorrect"));
    }
}
