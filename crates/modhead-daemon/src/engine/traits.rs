//! Rule engine trait definition

use crate::error::EngineResult;
use async_trait::async_trait;
use modhead_types::{Rule, RuleId};

/// The host's request-modification engine, as seen by the installer.
///
/// `update_rules` is all-or-nothing: either every removal and addition takes
/// effect, or the installed set is left exactly as it was.
#[async_trait]
pub trait RuleEngine: Send + Sync {
    /// Installed rules, ordered by id
    async fn installed_rules(&self) -> EngineResult<Vec<Rule>>;

    /// Ids of the installed rules
    async fn installed_rule_ids(&self) -> EngineResult<Vec<RuleId>> {
        Ok(self
            .installed_rules()
            .await?
            .into_iter()
            .map(|rule| rule.id)
            .collect())
    }

    /// Remove `remove_rule_ids` then add `add_rules`, as one update.
    ///
    /// Unknown ids in `remove_rule_ids` are ignored.
    async fn update_rules(&self, remove_rule_ids: &[RuleId], add_rules: Vec<Rule>)
        -> EngineResult<()>;
}
