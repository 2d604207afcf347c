use super::MediaGate;
use crate::access::{decide, Classification, Requester};
use crate::content::{Asset, ContentProvider, Visibility};
use crate::request::Request;

/// The result of a generic content query, as the host platform would
///  render it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub items: Vec<Asset>,
    /// The platform is about to answer "not found"
    pub is_not_found: bool,
    /// The platform is about to render the result as a feed
    pub is_feed: bool,
}

impl Listing {
    /// A query that matched nothing
    pub fn not_found() -> Self {
        Self {
            items: Vec::new(),
            is_not_found: true,
            is_feed: false,
        }
    }
}

/// An asset ready for rendering, with its effective credential resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampedAsset {
    pub asset: Asset,
    pub classification: Classification,
}

impl StampedAsset {
    /// The passphrase a page rendering this asset must ask for, if any
    pub fn effective_password(&self) -> Option<&str> {
        self.classification.password().filter(|p| !p.is_empty())
    }

    /// Whether `requester` still has to enter the passphrase
    pub fn password_required(&self, requester: &Requester) -> bool {
        matches!(self.classification, Classification::PasswordProtected { .. })
            && !decide(&self.classification, requester).is_allowed()
    }
}

impl<P: ContentProvider> MediaGate<P> {
    /// Rescue an empty listing for a gated request.
    ///
    /// When the generic query found nothing but the request names an
    ///  attachment, that attachment becomes the sole result and the
    ///  not-found and feed flags are cleared. Private attachments stay
    ///  hidden from requesters without the read-private capability, so
    ///  the listing does not reveal that they exist.
    pub async fn filter_listing(
        &self,
        listing: Listing,
        request: &Request,
        requester: &Requester,
    ) -> Listing {
        if !listing.items.is_empty() {
            return listing;
        }
        let Some(id) = request.attachment_id() else {
            return listing;
        };
        let Some(asset) = self.lookup(id).await else {
            return listing;
        };

        if asset.visibility == Visibility::Private && !requester.has_elevated_capability() {
            return listing;
        }

        Listing {
            items: vec![asset],
            is_not_found: false,
            is_feed: false,
        }
    }

    /// Decide the canonical redirect for a request. Gated requests are
    ///  served as-is, since canonicalisation would drop the query the
    ///  gateway depends on; everything else gets `canonical` unchanged.
    pub fn canonical_redirect(&self, request: &Request, canonical: Option<String>) -> Option<String> {
        if request.is_gated() {
            if let Some(url) = &canonical {
                tracing::debug!(canonical = %url, "suppressing canonical redirect for gated request");
            }
            return None;
        }
        canonical
    }

    /// Resolve the effective credential of an asset about to be rendered
    pub async fn stamp(&self, asset: Asset) -> StampedAsset {
        let classification = self.classify(&asset).await;
        StampedAsset {
            asset,
            classification,
        }
    }
}
