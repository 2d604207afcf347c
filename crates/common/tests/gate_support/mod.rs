//! Shared fixtures for gate integration tests
#![allow(dead_code)]

use common::prelude::*;
use common::rules::{MemoryRuleSink, UploadsUrlResolver};
use url::Url;

pub const SITE: &str = "https://example.com";
pub const UPLOADS: &str = "https://example.com/wp-content/uploads/";

/// A gate over an empty in-memory store, plus the sink it persists to
pub fn setup_gate() -> (MediaGate<MemoryContentProvider>, MemoryContentProvider, MemoryRuleSink) {
    let provider = MemoryContentProvider::new();
    let sink = MemoryRuleSink::new();
    let gate = MediaGate::new(
        provider.clone(),
        Url::parse(SITE).unwrap(),
        UploadsUrlResolver::new(Url::parse(UPLOADS).unwrap()),
    )
    .with_sink(sink.clone());
    (gate, provider, sink)
}

pub fn gated(id: u64) -> Request {
    Request::from_query(&format!("hl_download=1&attachment_id={}", id))
}
