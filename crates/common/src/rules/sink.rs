use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::rule_set::RuleSet;

#[derive(Debug, thiserror::Error)]
pub enum RuleSinkError {
    #[error("failed to write rules: {0}")]
    Io(#[from] std::io::Error),
    #[error("rule sink error: {0}")]
    Other(String),
}

/// Receives a freshly generated rule set and persists it wherever the web
///  server reads its rewrite configuration from.
#[async_trait]
pub trait RuleSink: Send + Sync {
    async fn persist(&self, rules: &RuleSet) -> Result<(), RuleSinkError>;
}

/// Keeps every persisted rule set in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRuleSink {
    persisted: Arc<Mutex<Vec<RuleSet>>>,
}

impl MemoryRuleSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently persisted rule set
    pub fn last(&self) -> Option<RuleSet> {
        self.persisted
            .lock()
            .ok()
            .and_then(|persisted| persisted.last().cloned())
    }

    /// How many times rules were persisted
    pub fn count(&self) -> usize {
        self.persisted
            .lock()
            .map(|persisted| persisted.len())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RuleSink for MemoryRuleSink {
    async fn persist(&self, rules: &RuleSet) -> Result<(), RuleSinkError> {
        self.persisted
            .lock()
            .map_err(|e| RuleSinkError::Other(format!("failed to acquire lock: {}", e)))?
            .push(rules.clone());
        Ok(())
    }
}
