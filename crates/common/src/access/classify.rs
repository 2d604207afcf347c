use super::credential::resolve_credential;
use crate::content::{Asset, ContentProvider, Visibility};

/// Extension point for rewriting a resolved passphrase before it is
///  compared against what a requester supplied, e.g. to pin a shared
///  passphrase on a staging environment.
///
/// Called exactly once per classification of a password-protected asset.
pub trait PasswordFilter: Send + Sync {
    fn resolve_password(&self, password: Option<String>, asset: &Asset) -> Option<String>;
}

/// Passes the resolved passphrase through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unfiltered;

impl PasswordFilter for Unfiltered {
    fn resolve_password(&self, password: Option<String>, _asset: &Asset) -> Option<String> {
        password
    }
}

/// The effective access policy of an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Public,
    Private,
    PasswordProtected {
        /// The effective credential; `None` means nothing gates the asset
        password: Option<String>,
    },
}

impl Classification {
    pub fn visibility(&self) -> Visibility {
        match self {
            Classification::Public => Visibility::Public,
            Classification::Private => Visibility::Private,
            Classification::PasswordProtected { .. } => Visibility::Password,
        }
    }

    /// The effective passphrase, if any
    pub fn password(&self) -> Option<&str> {
        match self {
            Classification::PasswordProtected { password } => password.as_deref(),
            _ => None,
        }
    }
}

/// Classify `asset` from its stored visibility, resolving the effective
///  credential for password-protected assets.
pub async fn classify<P: ContentProvider>(
    provider: &P,
    filter: &dyn PasswordFilter,
    asset: &Asset,
) -> Classification {
    match asset.visibility {
        Visibility::Public => Classification::Public,
        Visibility::Private => Classification::Private,
        Visibility::Password => {
            let resolved = resolve_credential(provider, asset).await;
            let password = filter.resolve_password(resolved, asset);
            Classification::PasswordProtected { password }
        }
    }
}
