use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::request::Parts;

use common::access::Requester;

use crate::ServiceState;

/// Cookie holding a passphrase entered at the prompt
pub const PASSWORD_COOKIE: &str = "media_gate_pass";
/// Header clients without a cookie jar can send a passphrase in
pub const PASSWORD_HEADER: &str = "x-media-password";

/// Who is asking, as far as the gate is concerned
#[derive(Debug, Clone)]
pub struct Authorized(pub Requester);

#[async_trait]
impl FromRequestParts<ServiceState> for Authorized {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Authorized(requester_from_headers(&parts.headers, state)))
    }
}

/// Guard for routes that need the read-private capability
#[derive(Debug, Clone, Copy)]
pub struct Editor;

#[async_trait]
impl FromRequestParts<ServiceState> for Editor {
    type Rejection = EditorRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(&parts.headers) {
            Some(token) if state.is_editor_token(token) => Ok(Editor),
            Some(_) => {
                tracing::warn!("rejected unknown editor token");
                Err(EditorRejection)
            }
            None => Err(EditorRejection),
        }
    }
}

#[derive(Debug)]
pub struct EditorRejection;

impl IntoResponse for EditorRejection {
    fn into_response(self) -> Response {
        let msg = serde_json::json!({"msg": "forbidden"});
        (StatusCode::FORBIDDEN, Json(msg)).into_response()
    }
}

pub fn requester_from_headers(headers: &HeaderMap, state: &ServiceState) -> Requester {
    let requester = match bearer_token(headers) {
        Some(token) if state.is_editor_token(token) => Requester::elevated(),
        _ => Requester::anonymous(),
    };

    let supplied = cookie(headers, PASSWORD_COOKIE).or_else(|| {
        headers
            .get(PASSWORD_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    });
    match supplied {
        Some(password) => requester.with_password(password),
        None => requester,
    }
}

/// `Set-Cookie` value remembering `password` for the rest of the session
pub fn password_cookie(password: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(password.as_bytes()).collect();
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        PASSWORD_COOKIE, encoded
    )
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim())
}

fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        // values are form-encoded by `password_cookie`, so they decode as a bare key
        .and_then(|(_, value)| url::form_urlencoded::parse(value.as_bytes()).next())
        .map(|(decoded, _)| decoded.into_owned())
}
