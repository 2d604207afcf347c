//! # Access
//!
//! Deciding whether a requester may receive an asset's bytes happens in
//! three steps, each usable on its own:
//!
//! 1. [`resolve_credential`] works out the passphrase that gates an asset:
//!    its own password, else the parent content item's, else nothing.
//! 2. [`classify`] turns the stored visibility into a [`Classification`],
//!    running the resolved passphrase through the [`PasswordFilter`]
//!    extension point exactly once.
//! 3. [`decide`] evaluates a [`Classification`] against a [`Requester`].
//!
//! A password-protected asset with no passphrase anywhere in the chain is
//! open to everyone. Protection needs a credential to check against.

mod classify;
mod credential;
mod decision;

pub use classify::{classify, Classification, PasswordFilter, Unfiltered};
pub use credential::resolve_credential;
pub use decision::{decide, Decision, Requester};
