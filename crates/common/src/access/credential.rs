use crate::content::{Asset, ContentProvider};

/// Resolve the passphrase gating `asset`.
///
/// The asset's own non-empty password wins. Otherwise the parent content
///  item's password is used, if the asset has a parent and that parent has
///  one. A parent that cannot be found, or a provider that fails to look
///  it up, counts as "no password".
pub async fn resolve_credential<P: ContentProvider>(provider: &P, asset: &Asset) -> Option<String> {
    if let Some(own) = asset.own_password() {
        return Some(own.to_string());
    }

    let parent_id = asset.parent_id?;
    match provider.content_item(parent_id).await {
        Ok(Some(parent)) => parent.password().map(str::to_string),
        Ok(None) => {
            tracing::debug!(asset_id = asset.id, parent_id, "parent content item not found");
            None
        }
        Err(e) => {
            tracing::warn!(
                asset_id = asset.id,
                parent_id,
                "failed to look up parent content item: {}",
                e
            );
            None
        }
    }
}
