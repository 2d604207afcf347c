/**
 * Domain records: assets, the content items they
 *  hang off of, and the provider trait the host
 *  platform implements to look them up.
 */
pub mod content;
/**
 * Access decisions over a single asset.
 *  - Credential resolution (own password, then parent's)
 *  - Visibility classification
 *  - Allow / deny evaluation for a requester
 */
pub mod access;
/**
 * The request shape the gateway cares about:
 *  query parameters and who is asking.
 */
pub mod request;
/**
 * Rewrite and crawler directives derived from the
 *  current set of protected assets.
 */
pub mod rules;
/**
 * The pipeline tying the above together. This is
 *  what a serving layer talks to.
 */
pub mod gate;

pub mod prelude {
    pub use crate::access::{Classification, Decision, PasswordFilter, Requester};
    pub use crate::content::{
        Asset, AssetId, ContentError, ContentItem, ContentItemId, ContentProvider, ContentStatus,
        MemoryContentProvider, Visibility,
    };
    pub use crate::gate::{Delivery, Listing, MediaGate, Refusal};
    pub use crate::request::Request;
    pub use crate::rules::{RuleSet, RuleSink, RuleSinkError, StorageUrlResolver};
}
