use std::fmt::{Debug, Display};

use async_trait::async_trait;

use super::{Asset, AssetId, ContentItem, ContentItemId, Visibility};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError<T> {
    #[error("unhandled content provider error: {0}")]
    Provider(#[from] T),
    /// An attribute write targeted an asset that does not exist
    #[error("asset not found: {0}")]
    AssetNotFound(AssetId),
}

/// Lookup and attribute access the host platform provides.
///
/// Lookups return `Ok(None)` for records that do not exist; errors are
///  reserved for the backing store itself failing.
#[async_trait]
pub trait ContentProvider: Send + Sync + std::fmt::Debug + Clone + 'static {
    type Error: Display + Debug + Send + Sync;

    /// Fetch a single asset, including its stored visibility attributes
    async fn asset(&self, id: AssetId) -> Result<Option<Asset>, ContentError<Self::Error>>;

    /// Fetch a single content item
    async fn content_item(
        &self,
        id: ContentItemId,
    ) -> Result<Option<ContentItem>, ContentError<Self::Error>>;

    /// List every asset whose visibility is private or password, in a
    ///  stable order (ascending id)
    async fn protected_assets(&self) -> Result<Vec<Asset>, ContentError<Self::Error>>;

    /// Write the visibility attribute of an asset
    ///
    /// Should fail with `ContentError::AssetNotFound` when the asset
    ///  does not exist.
    async fn set_visibility(
        &self,
        id: AssetId,
        visibility: Visibility,
    ) -> Result<(), ContentError<Self::Error>>;

    /// Write (or clear, with `None`) the password attribute of an asset
    async fn set_password(
        &self,
        id: AssetId,
        password: Option<String>,
    ) -> Result<(), ContentError<Self::Error>>;
}
