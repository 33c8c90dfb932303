//! In-memory rule engine

use super::traits::RuleEngine;
use super::update::{plan_update, RuleSet};
use crate::error::EngineResult;
use async_trait::async_trait;
use modhead_types::{Rule, RuleId};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Rule engine that keeps installed rules in memory
#[derive(Debug)]
pub struct InMemoryRuleEngine {
    rules: RwLock<RuleSet>,
    max_rules: usize,
    updates: AtomicU64,
}

impl Default for InMemoryRuleEngine {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_RULES)
    }
}

impl InMemoryRuleEngine {
    pub fn new(max_rules: usize) -> Self {
        Self {
            rules: RwLock::new(RuleSet::new()),
            max_rules,
            updates: AtomicU64::new(0),
        }
    }

    /// Number of successful updates applied so far
    pub fn update_count(&self) -> u64 {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuleEngine for InMemoryRuleEngine {
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
        *rules = next;
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
