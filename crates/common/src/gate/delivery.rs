use super::MediaGate;
use crate::access::{decide, Classification, Decision, Requester};
use crate::content::{Asset, AssetId, ContentProvider};
use crate::request::Request;

/// Outcome of a gated-endpoint request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Stream the file at `asset.storage_path` as `asset.mime_type`, then
    ///  end the response.
    File(Asset),
    /// Withhold the file.
    Refused(Refusal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refusal {
    /// No such asset (or an id that does not parse)
    NotFound,
    /// The asset exists but the requester may not have it
    Unauthorized {
        asset: Asset,
        classification: Classification,
    },
}

impl<P: ContentProvider> MediaGate<P> {
    /// Decide what to send back for a request for asset `id`.
    #[tracing::instrument(skip(self, requester), fields(elevated = requester.has_elevated_capability()))]
    pub async fn deliver(&self, id: AssetId, requester: &Requester) -> Delivery {
        let Some(asset) = self.lookup(id).await else {
            tracing::debug!("asset not found");
            return Delivery::Refused(Refusal::NotFound);
        };

        let classification = self.classify(&asset).await;
        match decide(&classification, requester) {
            Decision::Allow => {
                tracing::debug!(visibility = %asset.visibility, "serving asset");
                Delivery::File(asset)
            }
            Decision::Deny => {
                tracing::info!(visibility = %asset.visibility, "refusing asset");
                Delivery::Refused(Refusal::Unauthorized {
                    asset,
                    classification,
                })
            }
        }
    }

    /// [`MediaGate::deliver`] for a raw request. `None` when the request
    ///  does not target the gated endpoint at all.
    pub async fn deliver_request(
        &self,
        request: &Request,
        requester: &Requester,
    ) -> Option<Delivery> {
        if !request.is_gated() {
            return None;
        }
        Some(match request.attachment_id() {
            Some(id) => self.deliver(id, requester).await,
            None => Delivery::Refused(Refusal::NotFound),
        })
    }
}
