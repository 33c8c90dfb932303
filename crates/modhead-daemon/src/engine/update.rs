//! Validation and planning of rule updates
//!
//! Both engine backends build the next rule set here first and only commit
//! it once every check has passed.

use crate::error::{EngineError, EngineResult};
use modhead_types::{Rule, RuleId};
use std::collections::BTreeMap;

/// Installed rules keyed by id
pub type RuleSet = BTreeMap<RuleId, Rule>;

/// Reject rules the host engine would refuse.
pub fn validate_rule(rule: &Rule) -> EngineResult<()> {
    let invalid = |reason: String| EngineError::InvalidRule {
        rule_id: rule.id,
        reason,
    };

    if rule.id.get() == 0 {
        return Err(invalid("rule id must be at least 1".to_string()));
    }
    if rule.priority == 0 {
        return Err(invalid("priority must be at least 1".to_string()));
    }
    if rule.request_headers().is_empty() {
        return Err(invalid("no header operations".to_string()));
    }
    if let Some(op) = rule.request_headers().iter().find(|op| op.header.is_empty()) {
        return Err(invalid(format!("empty header name for value {:?}", op.value)));
    }
    if rule.condition.regex_filter.is_empty() {
        return Err(invalid("empty regexFilter".to_string()));
    }
    regex::Regex::new(&rule.condition.regex_filter)
        .map_err(|e| invalid(format!("regexFilter does not compile: {e}")))?;
    Ok(())
}

/// Compute the rule set after removing `remove` and adding `add`.
///
/// `current` is not touched; the caller swaps in the result on success.
pub fn plan_update(
    current: &RuleSet,
    remove: &[RuleId],
    add: Vec<Rule>,
    max_rules: usize,
) -> EngineResult<RuleSet> {
    let mut next = current.clone();
    for id in remove {
        next.remove(id);
    }

    for rule in add {
        validate_rule(&rule)?;
        if next.contains_key(&rule.id) {
            return Err(EngineError::DuplicateRuleId(rule.id));
        }
        next.insert(rule.id, rule);
    }

    if next.len() > max_rules {
        return Err(EngineError::QuotaExceeded {
            requested: next.len(),
            limit: max_rules,
        });
    }

    Ok(next)
}
