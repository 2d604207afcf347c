//! # Gate
//!
//! [`MediaGate`] is the pipeline a serving layer drives. It owns the
//! collaborators (content lookup, storage URLs, the password filter and
//! the rule sink) and exposes one method per place the host platform
//! needs a decision:
//!
//! - [`MediaGate::deliver`] for the gated endpoint
//! - [`MediaGate::filter_listing`] when a generic content query came up empty
//! - [`MediaGate::canonical_redirect`] before a canonical redirect is issued
//! - [`MediaGate::stamp`] before a single asset is rendered
//! - [`MediaGate::on_asset_created`], [`MediaGate::on_asset_edited`] and
//!   [`MediaGate::on_content_item_edited`] after writes
//! - [`MediaGate::generate_rules`] for rewrite and crawler output

use std::sync::Arc;

use tokio::sync::Mutex;
use url::Url;

use crate::access::{self, Classification, PasswordFilter, Unfiltered};
use crate::content::{Asset, AssetId, ContentProvider};
use crate::rules::{RuleSink, StorageUrlResolver};

mod delivery;
mod listing;
mod propagate;

pub use delivery::{Delivery, Refusal};
pub use listing::{Listing, StampedAsset};

/// Default path of the gated endpoint, relative to the site root
pub const DEFAULT_ENDPOINT: &str = "/index.php";

pub struct MediaGate<P: ContentProvider> {
    provider: P,
    site: Url,
    endpoint: String,
    urls: Arc<dyn StorageUrlResolver>,
    filter: Arc<dyn PasswordFilter>,
    sink: Option<Arc<dyn RuleSink>>,
    /// Held from listing protected assets until the sink is done, shared
    ///  by every clone
    regenerating: Arc<Mutex<()>>,
}

impl<P: ContentProvider> Clone for MediaGate<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            site: self.site.clone(),
            endpoint: self.endpoint.clone(),
            urls: self.urls.clone(),
            filter: self.filter.clone(),
            sink: self.sink.clone(),
            regenerating: self.regenerating.clone(),
        }
    }
}

impl<P: ContentProvider> std::fmt::Debug for MediaGate<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaGate")
            .field("provider", &self.provider)
            .field("site", &self.site.as_str())
            .field("endpoint", &self.endpoint)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl<P: ContentProvider> MediaGate<P> {
    pub fn new(provider: P, site: Url, urls: impl StorageUrlResolver + 'static) -> Self {
        Self {
            provider,
            site,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            urls: Arc::new(urls),
            filter: Arc::new(Unfiltered),
            sink: None,
            regenerating: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_password_filter(mut self, filter: impl PasswordFilter + 'static) -> Self {
        self.filter = Arc::new(filter);
        self
    }

    pub fn with_sink(mut self, sink: impl RuleSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn site(&self) -> &Url {
        &self.site
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Look up an asset, treating provider failures as "not found"
    pub async fn lookup(&self, id: AssetId) -> Option<Asset> {
        match self.provider.asset(id).await {
            Ok(asset) => asset,
            Err(e) => {
                tracing::warn!(asset_id = id, "failed to look up asset: {}", e);
                None
            }
        }
    }

    pub async fn classify(&self, asset: &Asset) -> Classification {
        access::classify(&self.provider, self.filter.as_ref(), asset).await
    }
}
