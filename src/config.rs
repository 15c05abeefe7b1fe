//! Mention session configuration
//!
//! Stored in `~/.config/mention/config.yaml`, or read from any YAML/JSON file
//! passed explicitly. Every field has a default, and keys are accepted in
//! both snake_case and camelCase.

use std::path::Path;

use anyhow::Context;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::model::{
    model_from_json, options_from_json, segments_from_json, MentionItem, MentionModel, Segment,
    TokenType,
};
use crate::parser::{BatchParser, ParseStrategy};
use crate::trigger::{
    trigger_configs_from_json, TriggerConfig, TriggerDefaults, TriggerRegistry, TriggersInput,
};

/// Shape of [`crate::session::MentionSession::value`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// `{ text, mentions }`
    #[default]
    Model,
    /// Segment list
    Segments,
    /// Visible plain text
    Text,
}

/// Visible row range of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBounds {
    pub min: usize,
    /// `None` means the input grows without limit
    pub max: Option<usize>,
}

/// Configuration of one mention input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MentionConfig {
    /// Single trigger, used when `triggers` resolves to nothing
    pub trigger: char,
    pub triggers: Option<TriggersInput>,
    #[serde(alias = "triggerConfigs", deserialize_with = "de_trigger_configs")]
    pub trigger_configs: Vec<TriggerConfig>,
    #[serde(deserialize_with = "de_options")]
    pub options: Vec<MentionItem>,

    #[serde(alias = "tokenType")]
    pub token_type: TokenType,
    pub closable: bool,

    #[serde(alias = "parseOnInit")]
    pub parse_on_init: Option<bool>,
    #[serde(alias = "parseStrategy")]
    pub parse_strategy: ParseStrategy,

    pub multiline: bool,
    pub rows: usize,
    #[serde(alias = "maxRows")]
    pub max_rows: Option<usize>,

    pub readonly: bool,
    pub disabled: bool,
    pub placeholder: Option<String>,
    pub autofocus: bool,

    pub value: Option<String>,
    #[serde(alias = "defaultValue")]
    pub default_value: Option<String>,
    /// Initial segments; a JSON string is accepted too
    #[serde(deserialize_with = "de_segments")]
    pub model: Option<Vec<Segment>>,
    /// Initial `{ text, mentions }`; a JSON string is accepted too
    #[serde(alias = "valueModel", deserialize_with = "de_value_model")]
    pub value_model: Option<MentionModel>,
    #[serde(alias = "valueFormat")]
    pub value_format: ValueFormat,
}

impl Default for MentionConfig {
    fn default() -> Self {
        Self {
            trigger: '@',
            triggers: None,
            trigger_configs: Vec::new(),
            options: Vec::new(),
            token_type: TokenType::Default,
            closable: false,
            parse_on_init: None,
            parse_strategy: ParseStrategy::Label,
            multiline: false,
            rows: 3,
            max_rows: None,
            readonly: false,
            disabled: false,
            placeholder: None,
            autofocus: false,
            value: None,
            default_value: None,
            model: None,
            value_model: None,
            value_format: ValueFormat::Model,
        }
    }
}

/// Structured config values may arrive as the value itself or as JSON text.
///
/// A malformed value drops only its own field, with a warning.
fn de_json_or<'de, D, T>(
    d: D,
    field: &str,
    from_json: impl FnOnce(&str) -> Option<T>,
) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<serde_json::Value>::deserialize(d)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => from_json(&s),
        Some(value) => match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Ignoring malformed `{}` in config: {}", field, e);
                None
            }
        },
    })
}

fn de_trigger_configs<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<TriggerConfig>, D::Error> {
    de_json_or(d, "trigger_configs", |s| Some(trigger_configs_from_json(s)))
        .map(Option::unwrap_or_default)
}

fn de_options<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<MentionItem>, D::Error> {
    de_json_or(d, "options", |s| Some(options_from_json(s))).map(Option::unwrap_or_default)
}

fn de_segments<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<Segment>>, D::Error> {
    de_json_or(d, "model", segments_from_json)
}

fn de_value_model<'de, D: Deserializer<'de>>(d: D) -> Result<Option<MentionModel>, D::Error> {
    de_json_or(d, "value_model", model_from_json)
}

impl MentionConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Load from an explicit file; `.json` files are read as JSON, anything else as YAML
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config = if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        };
        Ok(config)
    }

    /// Write the config, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        } else {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        };
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Triggers in effect: the parsed `triggers` list, else the single `trigger`
    pub fn effective_triggers(&self) -> Vec<char> {
        match self.triggers.as_ref().map(TriggersInput::resolve) {
            Some(list) if !list.is_empty() => list,
            _ => vec![self.trigger],
        }
    }

    pub fn registry(&self) -> TriggerRegistry {
        let mut registry = TriggerRegistry::new(self.effective_triggers()).with_defaults(
            TriggerDefaults {
                options: self.options.clone(),
                token_type: self.token_type,
                closable: self.closable,
            },
        );
        for cfg in &self.trigger_configs {
            registry.insert(cfg.clone());
        }
        registry
    }

    /// Read-only or disabled inputs accept no edits
    pub fn is_read_only(&self) -> bool {
        self.readonly || self.disabled
    }

    pub fn row_bounds(&self) -> RowBounds {
        if !self.multiline {
            return RowBounds { min: 1, max: None };
        }
        let min = self.rows.max(1);
        let max = match self.max_rows {
            Some(m) if m > 0 => Some(m.max(min)),
            _ => None,
        };
        RowBounds { min, max }
    }

    /// Segments the session starts with.
    ///
    /// Structured `model` wins over `value_model`, which wins over plain
    /// text. Plain text is parsed when `parse_on_init` says so, or when it is
    /// unset and the text contains a trigger.
    pub fn initial_segments(&self, registry: &TriggerRegistry) -> Vec<Segment> {
        if let Some(segments) = &self.model {
            return segments.clone();
        }
        if let Some(model) = &self.value_model {
            return model.to_segments();
        }
        let text = self
            .value
            .as_deref()
            .or(self.default_value.as_deref())
            .unwrap_or_default();
        if text.is_empty() {
            return Vec::new();
        }
        let parse = self
            .parse_on_init
            .unwrap_or_else(|| registry.contains_trigger(text));
        if parse {
            BatchParser::new(registry, self.parse_strategy).parse(text)
        } else {
            vec![Segment::text(text)]
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}
