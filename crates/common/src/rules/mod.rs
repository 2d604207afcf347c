//! # Rules
//!
//! Direct storage URLs of protected assets have to stop working. The web
//! server is told to route each of them to the gated endpoint through a
//! block of rewrite rules, and crawlers are told to stay away through
//! `Disallow` lines.
//!
//! Both outputs are derived from the current set of protected assets and
//! nothing else. They are rebuilt from scratch every time, never patched.

mod block;
mod rule_set;
mod sink;
mod urls;

pub use block::{splice_block, BLOCK_MARKER};
pub use rule_set::{root_relative, RewriteRule, RuleSet};
pub use sink::{MemoryRuleSink, RuleSink, RuleSinkError};
pub use urls::{StorageUrlError, StorageUrlResolver, UploadsUrlResolver};
