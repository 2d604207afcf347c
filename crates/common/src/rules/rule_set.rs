use percent_encoding::percent_decode_str;
use serde::Serialize;
use url::Url;

use super::urls::StorageUrlResolver;
use crate::content::{Asset, AssetId};
use crate::request::gated_target;

/// One intercepted direct URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteRule {
    pub asset_id: AssetId,
    /// Root-relative path of the asset's public URL, with a leading slash.
    ///  Percent-encoded, as it appears on the wire.
    pub path: String,
    /// Where the web server sends requests for `path`
    pub target: String,
}

impl RewriteRule {
    /// The mod_rewrite directive for this rule
    pub fn directive(&self) -> String {
        format!("RewriteRule {} {} [NC,L]", self.pattern(), self.target)
    }

    /// Exact-match pattern for the path. mod_rewrite matches against the
    ///  decoded per-directory path, which has no leading slash.
    pub fn pattern(&self) -> String {
        let mut pattern = String::from("^");
        for c in regex::escape(&self.decoded_path()).chars() {
            // an unescaped space would end the argument
            if c == ' ' {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('$');
        pattern
    }

    /// The path as the web server sees it after decoding
    pub fn decoded_path(&self) -> String {
        percent_decode_str(self.path.trim_start_matches('/'))
            .decode_utf8_lossy()
            .into_owned()
    }

    pub fn disallow(&self) -> String {
        format!("Disallow: {}", self.path)
    }
}

/// Rewrite and crawler directives for every currently protected asset,
///  in the order the assets were listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    rules: Vec<RewriteRule>,
}

impl RuleSet {
    /// Build the rule set for `assets`. Public assets are skipped, as are
    ///  assets whose URL does not strip to a non-empty path below `site`.
    pub fn generate(
        assets: &[Asset],
        urls: &dyn StorageUrlResolver,
        site: &Url,
        endpoint: &str,
    ) -> Self {
        let mut rules = Vec::with_capacity(assets.len());
        for asset in assets.iter().filter(|a| a.visibility.is_protected()) {
            // URL parsing drops tabs and line breaks, so no rule could match
            if asset.storage_path.chars().any(char::is_control) {
                tracing::warn!(
                    asset_id = asset.id,
                    "skipping rewrite rule: storage path contains control characters"
                );
                continue;
            }
            let url = match urls.public_url(asset) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(asset_id = asset.id, "skipping rewrite rule: {}", e);
                    continue;
                }
            };
            let Some(path) = root_relative(site, &url) else {
                tracing::warn!(
                    asset_id = asset.id,
                    url = %url,
                    "skipping rewrite rule: url is not below the site origin"
                );
                continue;
            };
            rules.push(RewriteRule {
                asset_id: asset.id,
                path,
                target: gated_target(endpoint, asset.id),
            });
        }
        Self { rules }
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rewrite block to splice into the web server configuration
    pub fn rewrite_block(&self) -> String {
        let mut block = String::from("<IfModule mod_rewrite.c>\nRewriteEngine On\n");
        for rule in &self.rules {
            block.push_str(&rule.directive());
            block.push('\n');
        }
        block.push_str("</IfModule>\n");
        block
    }

    /// `Disallow` lines for every intercepted path
    pub fn crawler_exclusions(&self) -> Vec<String> {
        self.rules.iter().map(RewriteRule::disallow).collect()
    }

    /// A robots.txt document: `base` followed by our exclusions
    pub fn robots_txt(&self, base: &str) -> String {
        let mut out = base.trim_end().to_string();
        out.push('\n');
        for line in self.crawler_exclusions() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

/// Strip the site origin from `url`, leaving a root-relative path.
///
/// Returns `None` when `url` is not below `site` or nothing but the site
///  root remains.
pub fn root_relative(site: &Url, url: &Url) -> Option<String> {
    let prefix = site.as_str().trim_end_matches('/');
    let rest = url.as_str().strip_prefix(prefix)?;
    if !rest.starts_with('/') || rest == "/" {
        return None;
    }
    Some(rest.to_string())
}
