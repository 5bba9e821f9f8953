//! Structured commands extracted from free text

use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain that produced a command.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Lighting,
    Music,
}

/// Typed attribute of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Number(n) => write!(f, "{n}"),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

/// A command ready for a domain handler.
///
/// `action` is fixed at construction; `target`, `parameter` and `attribute`
/// are filled in afterwards by the stage that discovers them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub domain: Domain,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<AttributeValue>,
}

impl ParsedCommand {
    pub fn new(domain: Domain, action: impl Into<String>) -> Self {
        Self {
            domain,
            action: action.into(),
            target: None,
            parameter: None,
            attribute: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeValue) -> Self {
        self.attribute = Some(attribute);
        self
    }
}
