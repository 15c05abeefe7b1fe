//! Candidate items and their identifying values

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a mention target: a string or an integer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MentionValue {
    Int(i64),
    Text(String),
}

impl fmt::Display for MentionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MentionValue::Int(n) => write!(f, "{}", n),
            MentionValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MentionValue {
    fn from(s: &str) -> Self {
        MentionValue::Text(s.to_string())
    }
}

impl From<String> for MentionValue {
    fn from(s: String) -> Self {
        MentionValue::Text(s)
    }
}

impl From<i64> for MentionValue {
    fn from(n: i64) -> Self {
        MentionValue::Int(n)
    }
}

impl From<i32> for MentionValue {
    fn from(n: i32) -> Self {
        MentionValue::Int(n.into())
    }
}

/// Appearance class of a rendered token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    #[default]
    Default,
    Primary,
    Success,
    Warning,
    Danger,
    Info,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Default => "default",
            TokenType::Primary => "primary",
            TokenType::Success => "success",
            TokenType::Warning => "warning",
            TokenType::Danger => "danger",
            TokenType::Info => "info",
        }
    }
}

/// A selectable candidate offered while a trigger is open
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionItem {
    pub value: MentionValue,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Disabled items are never offered by the candidate engine
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    /// Overrides the trigger's token appearance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_type: Option<TokenType>,
    /// Overrides the trigger's closability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Arbitrary host data, carried into the mention as `extra`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl MentionItem {
    pub fn new(value: impl Into<MentionValue>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            avatar: None,
            description: None,
            disabled: false,
            tag_type: None,
            closable: None,
            class_name: None,
            style: None,
            data: None,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Parse a JSON array of items; anything malformed yields an empty list
pub fn options_from_json(json: &str) -> Vec<MentionItem> {
    match serde_json::from_str::<Vec<MentionItem>>(json) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("Ignoring malformed options JSON: {}", e);
            Vec::new()
        }
    }
}
