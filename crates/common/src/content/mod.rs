//! # Content
//!
//! Records the gateway reasons about. An [`Asset`] is a stored binary file
//! (image, document) and may be attached to a [`ContentItem`], the post or
//! page it was uploaded for. The asset only holds the parent's id; the
//! parent is looked up through a [`ContentProvider`] whenever it is needed
//! and never cached across requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod memory;
mod provider;

pub use memory::{MemoryContentProvider, MemoryContentProviderError};
pub use provider::{ContentError, ContentProvider};

pub type AssetId = u64;
pub type ContentItemId = u64;

/// The access policy tag stored on an asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Reachable by anyone through its direct URL.
    #[default]
    Public,
    /// Only requesters holding the read-private capability.
    Private,
    /// Gated by a shared passphrase, possibly inherited from the parent.
    Password,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Password => "password",
        }
    }

    /// Interpret a raw stored value. Missing or unrecognised values are
    ///  public, which is what the attribute store hands back for assets
    ///  nobody ever touched.
    pub fn from_stored(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or(Visibility::Public)
    }

    /// Whether direct URL access to the asset has to be intercepted
    pub fn is_protected(&self) -> bool {
        !matches!(self, Visibility::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0}")]
pub struct UnknownValue(pub String);

impl FromStr for Visibility {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            "password" => Ok(Visibility::Password),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// Publication status of a content item. Only `Private` matters to the
///  gateway, the rest is carried so records round-trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Publish,
    Draft,
    Pending,
    Private,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Publish => "publish",
            ContentStatus::Draft => "draft",
            ContentStatus::Pending => "pending",
            ContentStatus::Private => "private",
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish" => Ok(ContentStatus::Publish),
            "draft" => Ok(ContentStatus::Draft),
            "pending" => Ok(ContentStatus::Pending),
            "private" => Ok(ContentStatus::Private),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// A stored binary file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    /// The content item this file was attached to, if any
    pub parent_id: Option<ContentItemId>,
    pub mime_type: String,
    /// Location relative to the uploads root, e.g. `2024/05/report.pdf`
    pub storage_path: String,
    #[serde(default)]
    pub visibility: Visibility,
    /// The asset's own passphrase. Empty means "inherit from the parent".
    #[serde(default)]
    pub own_password: Option<String>,
}

impl Asset {
    pub fn new(id: AssetId, mime_type: impl Into<String>, storage_path: impl Into<String>) -> Self {
        Self {
            id,
            parent_id: None,
            mime_type: mime_type.into(),
            storage_path: storage_path.into(),
            visibility: Visibility::Public,
            own_password: None,
        }
    }

    pub fn with_parent(mut self, parent_id: ContentItemId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.own_password = Some(password.into());
        self
    }

    /// The asset's own passphrase, treating an empty string as unset
    pub fn own_password(&self) -> Option<&str> {
        non_empty(self.own_password.as_deref())
    }
}

/// The post or page an asset belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentItemId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: ContentStatus,
    #[serde(default)]
    pub password: Option<String>,
}

impl ContentItem {
    pub fn new(id: ContentItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            status: ContentStatus::Publish,
            password: None,
        }
    }

    pub fn with_status(mut self, status: ContentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// The item's passphrase, treating an empty string as unset
    pub fn password(&self) -> Option<&str> {
        non_empty(self.password.as_deref())
    }

    pub fn is_private(&self) -> bool {
        self.status == ContentStatus::Private
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
