use std::collections::HashMap;

use crate::content::AssetId;

/// Query parameter flagging a request for the gated endpoint
pub const DOWNLOAD_PARAM: &str = "hl_download";
/// Query parameter carrying the requested asset id
pub const ATTACHMENT_PARAM: &str = "attachment_id";

/// The parts of an incoming request the gateway looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    query_params: HashMap<String, String>,
}

impl Request {
    pub fn new(query_params: HashMap<String, String>) -> Self {
        Self { query_params }
    }

    /// Build a request from a raw (already split off) query string
    pub fn from_query(query: &str) -> Self {
        let query_params = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        Self { query_params }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.query_params.get(key).map(String::as_str)
    }

    /// Whether the request targets the gated endpoint. Both parameters
    ///  must be present; their values are not inspected here.
    pub fn is_gated(&self) -> bool {
        self.query_params.contains_key(DOWNLOAD_PARAM)
            && self.query_params.contains_key(ATTACHMENT_PARAM)
    }

    /// The requested asset id of a gated request, if it parses
    pub fn attachment_id(&self) -> Option<AssetId> {
        if !self.is_gated() {
            return None;
        }
        self.param(ATTACHMENT_PARAM)?.trim().parse().ok()
    }
}

/// The gated endpoint URL for `asset_id`, relative to the site root
pub fn gated_target(endpoint: &str, asset_id: AssetId) -> String {
    format!(
        "{}?{}=1&{}={}",
        endpoint, DOWNLOAD_PARAM, ATTACHMENT_PARAM, asset_id
    )
}
