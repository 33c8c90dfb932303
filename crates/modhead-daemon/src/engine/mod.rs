//! Rule engine backends
//!
//! The engine is where compiled rules end up. Updates replace rules as one
//! step and are refused whole when any rule is invalid.

mod file;
mod memory;
mod traits;
mod update;

pub use file::JsonFileRuleEngine;
pub use memory::InMemoryRuleEngine;
pub use traits::RuleEngine;
pub use update::{plan_update, validate_rule, RuleSet};

use crate::config::EngineConfig;
use crate::error::EngineResult;
use std::sync::Arc;

/// Build the engine described by `config`
pub async fn open_engine(config: &EngineConfig) -> EngineResult<Arc<dyn RuleEngine>> {
    let engine: Arc<dyn RuleEngine> = match config {
        EngineConfig::Memory { max_rules } => Arc::new(InMemoryRuleEngine::new(*max_rules)),
        EngineConfig::File { path, max_rules } => {
            Arc::new(JsonFileRuleEngine::open(path, *max_rules).await?)
        }
    };
    Ok(engine)
}
