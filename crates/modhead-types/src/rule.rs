//! Compiled rules in the shape the host request-modification engine expects
//!
//! Serialized field and enum names follow the engine's dynamic rule format
//! (`regexFilter`, `resourceTypes`, `modifyHeaders`, `set`/`append`).

use crate::ids::RuleId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of request a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    MainFrame,
    SubFrame,
    Stylesheet,
    Script,
    Image,
    Font,
    Object,
    Xmlhttprequest,
    Ping,
    CspReport,
    Media,
    Websocket,
    Other,
}

impl ResourceType {
    /// Every resource kind, in the order rules list them
    pub const ALL: [ResourceType; 13] = [
        ResourceType::MainFrame,
        ResourceType::SubFrame,
        ResourceType::Stylesheet,
        ResourceType::Script,
        ResourceType::Image,
        ResourceType::Font,
        ResourceType::Object,
        ResourceType::Xmlhttprequest,
        ResourceType::Ping,
        ResourceType::CspReport,
        ResourceType::Media,
        ResourceType::Websocket,
        ResourceType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::MainFrame => "main_frame",
            ResourceType::SubFrame => "sub_frame",
            ResourceType::Stylesheet => "stylesheet",
            ResourceType::Script => "script",
            ResourceType::Image => "image",
            ResourceType::Font => "font",
            ResourceType::Object => "object",
            ResourceType::Xmlhttprequest => "xmlhttprequest",
            ResourceType::Ping => "ping",
            ResourceType::CspReport => "csp_report",
            ResourceType::Media => "media",
            ResourceType::Websocket => "websocket",
            ResourceType::Other => "other",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a header operation does to the outgoing request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderOperation {
    /// Overwrite any existing value
    Set,
    /// Add a value using the engine's own joining rules
    Append,
}

impl fmt::Display for HeaderOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderOperation::Set => f.write_str("set"),
            HeaderOperation::Append => f.write_str("append"),
        }
    }
}

/// One header mutation inside a rule action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyHeaderInfo {
    pub header: String,
    pub operation: HeaderOperation,
    pub value: String,
}

impl ModifyHeaderInfo {
    pub fn set(header: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            operation: HeaderOperation::Set,
            value: value.into(),
        }
    }

    pub fn append(header: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            operation: HeaderOperation::Append,
            value: value.into(),
        }
    }
}

/// Action kind; only header modification is ever emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleActionType {
    #[default]
    ModifyHeaders,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleAction {
    #[serde(rename = "type")]
    pub action_type: RuleActionType,
    pub request_headers: Vec<ModifyHeaderInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCondition {
    pub regex_filter: String,
    pub resource_types: Vec<ResourceType>,
}

/// A host-engine-ready rule compiled from one profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub priority: u32,
    pub action: RuleAction,
    pub condition: RuleCondition,
}

impl Rule {
    /// Build a header-modification rule scoped to every resource type.
    pub fn modify_headers(
        id: RuleId,
        priority: u32,
        regex_filter: impl Into<String>,
        request_headers: Vec<ModifyHeaderInfo>,
    ) -> Self {
        Self {
            id,
            priority,
            action: RuleAction {
                action_type: RuleActionType::ModifyHeaders,
                request_headers,
            },
            condition: RuleCondition {
                regex_filter: regex_filter.into(),
                resource_types: ResourceType::ALL.to_vec(),
            },
        }
    }

    pub fn request_headers(&self) -> &[ModifyHeaderInfo] {
        &self.action.request_headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rule_serializes_to_engine_format() {
        let rule = Rule::modify_headers(
            RuleId::FIRST,
            1,
            "example.com",
            vec![ModifyHeaderInfo::set("X-Test", "123")],
        );
        let value = serde_json::to_value(&rule).unwrap();

        assert_eq!(value["id"], 1);
        assert_eq!(value["priority"], 1);
        assert_eq!(value["action"]["type"], "modifyHeaders");
        assert_eq!(
            value["action"]["requestHeaders"],
            json!([{ "header": "X-Test", "operation": "set", "value": "123" }])
        );
        assert_eq!(value["condition"]["regexFilter"], "example.com");
        assert_eq!(value["condition"]["resourceTypes"][0], "main_frame");
        assert_eq!(value["condition"]["resourceTypes"][9], "csp_report");
        assert_eq!(value["condition"]["resourceTypes"].as_array().unwrap().len(), 13);
    }

    #[test]
    fn resource_type_names_match_serde() {
        for kind in ResourceType::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.as_str());
        }
    }

    #[test]
    fn append_operation_is_lowercase() {
        let op = ModifyHeaderInfo::append("Accept", "text/html");
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value["operation"], "append");
        assert_eq!(HeaderOperation::Append.to_string(), "append");
    }
}
