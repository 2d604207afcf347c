use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::provider::{ContentError, ContentProvider};
use super::{Asset, AssetId, ContentItem, ContentItemId, Visibility};

/// In-memory content provider backed by ordered maps
#[derive(Debug, Clone)]
pub struct MemoryContentProvider {
    inner: Arc<RwLock<MemoryContentProviderInner>>,
}

#[derive(Debug, Default)]
struct MemoryContentProviderInner {
    assets: BTreeMap<AssetId, Asset>,
    content_items: BTreeMap<ContentItemId, ContentItem>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryContentProviderError {
    #[error("memory provider error: {0}")]
    Internal(String),
}

type Result<T> = std::result::Result<T, ContentError<MemoryContentProviderError>>;

impl MemoryContentProvider {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryContentProviderInner::default())),
        }
    }

    /// Insert or replace an asset record
    pub fn insert_asset(&self, asset: Asset) -> Result<()> {
        self.write()?.assets.insert(asset.id, asset);
        Ok(())
    }

    /// Insert or replace a content item record
    pub fn insert_content_item(&self, item: ContentItem) -> Result<()> {
        self.write()?.content_items.insert(item.id, item);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryContentProviderInner>> {
        self.inner.read().map_err(|e| {
            ContentError::Provider(MemoryContentProviderError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryContentProviderInner>> {
        self.inner.write().map_err(|e| {
            ContentError::Provider(MemoryContentProviderError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })
    }
}

impl Default for MemoryContentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentProvider for MemoryContentProvider {
    type Error = MemoryContentProviderError;

    async fn asset(&self, id: AssetId) -> Result<Option<Asset>> {
        Ok(self.read()?.assets.get(&id).cloned())
    }

    async fn content_item(&self, id: ContentItemId) -> Result<Option<ContentItem>> {
        Ok(self.read()?.content_items.get(&id).cloned())
    }

    async fn protected_assets(&self) -> Result<Vec<Asset>> {
        Ok(self
            .read()?
            .assets
            .values()
            .filter(|asset| asset.visibility.is_protected())
            .cloned()
            .collect())
    }

    async fn set_visibility(&self, id: AssetId, visibility: Visibility) -> Result<()> {
        let mut inner = self.write()?;
        let asset = inner
            .assets
            .get_mut(&id)
            .ok_or(ContentError::AssetNotFound(id))?;
        asset.visibility = visibility;
        Ok(())
    }

    async fn set_password(&self, id: AssetId, password: Option<String>) -> Result<()> {
        let mut inner = self.write()?;
        let asset = inner
            .assets
            .get_mut(&id)
            .ok_or(ContentError::AssetNotFound(id))?;
        asset.own_password = password;
        Ok(())
    }
}
