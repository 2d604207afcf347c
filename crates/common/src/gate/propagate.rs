use super::MediaGate;
use crate::content::{AssetId, ContentError, ContentItemId, ContentProvider, Visibility};
use crate::rules::RuleSet;

impl<P: ContentProvider> MediaGate<P> {
    /// Build the rule set from the current store contents
    pub async fn generate_rules(&self) -> Result<RuleSet, ContentError<P::Error>> {
        let assets = self.provider.protected_assets().await?;
        Ok(RuleSet::generate(
            &assets,
            self.urls.as_ref(),
            &self.site,
            &self.endpoint,
        ))
    }

    /// Rebuild the rule set and hand it to the sink.
    ///
    /// Failures are logged and swallowed: the write that triggered the
    ///  regeneration has already happened and stays valid. Returns the
    ///  rule set that was generated, if any.
    ///
    /// Regenerations run one at a time, so the last rule set persisted is
    ///  always listed after the last write that preceded it.
    pub async fn regenerate_rules(&self) -> Option<RuleSet> {
        let _guard = self.regenerating.lock().await;
        let rules = match self.generate_rules().await {
            Ok(rules) => rules,
            Err(e) => {
                tracing::error!("failed to list protected assets, keeping previous rules: {}", e);
                return None;
            }
        };

        match &self.sink {
            Some(sink) => match sink.persist(&rules).await {
                Ok(()) => tracing::info!(rules = rules.len(), "rewrite rules persisted"),
                Err(e) => tracing::warn!("failed to persist rewrite rules: {}", e),
            },
            None => tracing::debug!(rules = rules.len(), "no rule sink configured"),
        }
        Some(rules)
    }

    /// A new asset was stored. Inherit protection from its parent, then
    ///  regenerate rules. Returns the visibility that was inherited.
    #[tracing::instrument(skip(self))]
    pub async fn on_asset_created(&self, id: AssetId) -> Option<Visibility> {
        let inherited = self.inherit_visibility(id).await;
        self.regenerate_rules().await;
        inherited
    }

    #[tracing::instrument(skip(self))]
    pub async fn on_asset_edited(&self, id: AssetId) {
        self.regenerate_rules().await;
    }

    #[tracing::instrument(skip(self))]
    pub async fn on_content_item_edited(&self, id: ContentItemId) {
        self.regenerate_rules().await;
    }

    /// Copy the parent's protection onto a freshly created asset. A parent
    ///  password makes the asset password-protected (with no password of
    ///  its own, so it keeps inheriting); a private parent makes it private.
    ///  Assets that already carry a non-default visibility are left alone.
    async fn inherit_visibility(&self, id: AssetId) -> Option<Visibility> {
        let asset = self.lookup(id).await?;
        if asset.visibility != Visibility::Public {
            return None;
        }
        let parent_id = asset.parent_id?;
        let parent = match self.provider.content_item(parent_id).await {
            Ok(parent) => parent?,
            Err(e) => {
                tracing::warn!(parent_id, "failed to look up parent content item: {}", e);
                return None;
            }
        };

        let visibility = if parent.password().is_some() {
            Visibility::Password
        } else if parent.is_private() {
            Visibility::Private
        } else {
            return None;
        };

        match self.provider.set_visibility(id, visibility).await {
            Ok(()) => {
                tracing::info!(parent_id, %visibility, "asset inherited parent protection");
                Some(visibility)
            }
            Err(e) => {
                tracing::warn!("failed to store inherited visibility: {}", e);
                None
            }
        }
    }
}
