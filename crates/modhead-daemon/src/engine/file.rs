//! Rule engine that publishes the installed set as a JSON file
//!
//! A browser-side shim loads the file and hands it to the native engine
//! wholesale. The file is only ever replaced atomically, so a reader sees
//! either the previous batch or the new one.

use super::traits::RuleEngine;
use super::update::{plan_update, RuleSet};
use crate::error::EngineResult;
use crate::fsutil::{read_optional, write_atomic};
use async_trait::async_trait;
use modhead_types::{Rule, RuleId};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

#[derive(Debug)]
pub struct JsonFileRuleEngine {
    path: PathBuf,
    rules: RwLock<RuleSet>,
    max_rules: usize,
}

impl JsonFileRuleEngine {
    /// Open the engine, picking up rules from a previous run if present.
    pub async fn open(path: impl Into<PathBuf>, max_rules: usize) -> EngineResult<Self> {
        let path = path.into();
        let rules: Vec<Rule> = match read_optional(&path).await? {
            Some(bytes) => serde_json::from_slice(&bytes)?,
            None => Vec::new(),
        };
        tracing::debug!(path = %path.display(), count = rules.len(), "Opened rule file");

        Ok(Self {
            path,
            rules: RwLock::new(rules.into_iter().map(|rule| (rule.id, rule)).collect()),
            max_rules,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RuleEngine for JsonFileRuleEngine {
    async fn installed_rules(&self) -> EngineResult<Vec<Rule>> {
        let rules = self.rules.read().await;
        Ok(rules.values().cloned().collect())
    }

    async fn update_rules(
        &self,
        remove_rule_ids: &[RuleId],
        add_rules: Vec<Rule>,
    ) -> EngineResult<()> {
        let mut rules = self.rules.write().await;
        let next = plan_update(&rules, remove_rule_ids, add_rules, self.max_rules)?;

        let batch: Vec<&Rule> = next.values().collect();
        let bytes = serde_json::to_vec_pretty(&batch)?;
        write_atomic(&self.path, &bytes).await?;

        *rules = next;
        Ok(())
    }
}
