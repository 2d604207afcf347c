use std::path::{Path, PathBuf};

use async_trait::async_trait;

use common::rules::{splice_block, RuleSet, RuleSink, RuleSinkError, BLOCK_MARKER};

/// Writes rewrite rules into the marked block of an Apache config file,
///  leaving everything outside the markers untouched.
#[derive(Debug, Clone)]
pub struct HtaccessSink {
    path: PathBuf,
}

impl HtaccessSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_existing(&self) -> Result<String, RuleSinkError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl RuleSink for HtaccessSink {
    async fn persist(&self, rules: &RuleSet) -> Result<(), RuleSinkError> {
        let existing = self.read_existing().await?;
        let updated = splice_block(&existing, BLOCK_MARKER, &rules.rewrite_block());
        if updated == existing {
            return Ok(());
        }

        // write next to the target so the rename stays on one filesystem
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        tokio::fs::write(&tmp, updated.as_bytes()).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), "htaccess updated");
        Ok(())
    }
}
