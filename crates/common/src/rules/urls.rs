use url::Url;

use crate::content::{Asset, AssetId};

#[derive(Debug, thiserror::Error)]
pub enum StorageUrlError {
    #[error("uploads url cannot hold a path, needed for asset {0}")]
    CannotBeABase(AssetId),
}

/// Maps an asset to the URL its file is publicly reachable at.
pub trait StorageUrlResolver: Send + Sync {
    fn public_url(&self, asset: &Asset) -> Result<Url, StorageUrlError>;
}

/// Assets live below a single uploads URL, at their storage path.
#[derive(Debug, Clone)]
pub struct UploadsUrlResolver {
    base: Url,
}

impl UploadsUrlResolver {
    pub fn new(mut base: Url) -> Self {
        // always a directory
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

impl StorageUrlResolver for UploadsUrlResolver {
    fn public_url(&self, asset: &Asset) -> Result<Url, StorageUrlError> {
        let mut url = self.base.clone();
        // each segment is percent-encoded on its own, so `?`, `#` and `%`
        //  stay part of the path
        url.path_segments_mut()
            .map_err(|_| StorageUrlError::CannotBeABase(asset.id))?
            .pop_if_empty()
            .extend(asset.storage_path.trim_start_matches('/').split('/'));
        Ok(url)
    }
}
