//! Trigger registry: which characters open a mention query, where their
//! candidates come from, and how their tokens look.
//!
//! Lookups are keyed by trigger character and fall back to the global
//! defaults when a trigger has no dedicated configuration.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::model::{MentionItem, TokenType};

/// Host-supplied candidate source, called with the live query
pub type OptionProvider = Rc<dyn Fn(&str) -> Vec<MentionItem>>;

/// Per-trigger overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerConfig {
    #[serde(rename = "char")]
    pub trigger: char,
    /// Dedicated candidates; an empty list falls back to the global options
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<MentionItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closable: Option<bool>,
}

impl TriggerConfig {
    pub fn new(trigger: char) -> Self {
        Self {
            trigger,
            options: Vec::new(),
            token_type: None,
            closable: None,
        }
    }

    pub fn with_options(mut self, options: Vec<MentionItem>) -> Self {
        self.options = options;
        self
    }

    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = Some(token_type);
        self
    }

    pub fn with_closable(mut self, closable: bool) -> Self {
        self.closable = Some(closable);
        self
    }
}

/// How triggers may be written in configuration: one string or a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TriggersInput {
    One(String),
    Many(Vec<String>),
}

impl TriggersInput {
    pub fn resolve(&self) -> Vec<char> {
        match self {
            TriggersInput::One(s) => parse_triggers_input(s),
            TriggersInput::Many(list) => single_chars(list.iter().map(String::as_str)),
        }
    }
}

/// Parse a trigger list written as a JSON array, a comma-separated list, or a single trigger
pub fn parse_triggers_input(input: &str) -> Vec<char> {
    let s = input.trim();
    if s.is_empty() {
        return Vec::new();
    }
    if (s.starts_with('[') && s.ends_with(']')) || (s.starts_with('"') && s.ends_with('"')) {
        match serde_json::from_str::<TriggersInput>(s) {
            Ok(TriggersInput::Many(list)) => return single_chars(list.iter().map(String::as_str)),
            Ok(TriggersInput::One(one)) => return single_chars(std::iter::once(one.as_str())),
            Err(e) => tracing::debug!("Triggers input is not JSON ({}), splitting instead", e),
        }
    }
    if s.contains(',') {
        return single_chars(s.split(',').map(str::trim));
    }
    single_chars(std::iter::once(s))
}

fn single_chars<'a>(items: impl Iterator<Item = &'a str>) -> Vec<char> {
    let mut out = Vec::new();
    for item in items.filter(|s| !s.is_empty()) {
        let mut chars = item.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => {
                if !out.contains(&ch) {
                    out.push(ch);
                }
            }
            _ => tracing::warn!("Ignoring multi-character trigger {:?}", item),
        }
    }
    out
}

/// Parse a JSON array of trigger configs; malformed input yields none
pub fn trigger_configs_from_json(json: &str) -> Vec<TriggerConfig> {
    match serde_json::from_str::<Vec<TriggerConfig>>(json) {
        Ok(configs) => configs,
        Err(e) => {
            tracing::warn!("Ignoring malformed trigger configs JSON: {}", e);
            Vec::new()
        }
    }
}

/// Values used when a trigger has no dedicated setting
#[derive(Debug, Clone, Default)]
pub struct TriggerDefaults {
    pub options: Vec<MentionItem>,
    pub token_type: TokenType,
    pub closable: bool,
}

/// Resolved look of one token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAppearance {
    pub token_type: TokenType,
    pub closable: bool,
}

/// Mapping from trigger character to its configuration
#[derive(Clone)]
pub struct TriggerRegistry {
    triggers: Vec<char>,
    configs: HashMap<char, TriggerConfig>,
    defaults: TriggerDefaults,
    providers: HashMap<char, OptionProvider>,
    fallback_provider: Option<OptionProvider>,
}

impl fmt::Debug for TriggerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerRegistry")
            .field("triggers", &self.triggers)
            .field("configs", &self.configs)
            .field("defaults", &self.defaults)
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("fallback_provider", &self.fallback_provider.is_some())
            .finish()
    }
}

impl Default for TriggerRegistry {
    fn default() -> Self {
        Self::new(vec!['@'])
    }
}

impl TriggerRegistry {
    pub fn new(triggers: Vec<char>) -> Self {
        Self {
            triggers,
            configs: HashMap::new(),
            defaults: TriggerDefaults::default(),
            providers: HashMap::new(),
            fallback_provider: None,
        }
    }

    pub fn with_defaults(mut self, defaults: TriggerDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_config(mut self, config: TriggerConfig) -> Self {
        self.insert(config);
        self
    }

    /// Add or replace a trigger's config. The trigger does not become active
    /// unless it is also in the trigger list.
    pub fn insert(&mut self, config: TriggerConfig) {
        self.configs.insert(config.trigger, config);
    }

    pub fn triggers(&self) -> &[char] {
        &self.triggers
    }

    pub fn is_trigger(&self, ch: char) -> bool {
        self.triggers.contains(&ch)
    }

    pub fn contains_trigger(&self, text: &str) -> bool {
        text.chars().any(|c| self.is_trigger(c))
    }

    pub fn config(&self, trigger: char) -> Option<&TriggerConfig> {
        self.configs.get(&trigger)
    }

    pub fn defaults(&self) -> &TriggerDefaults {
        &self.defaults
    }

    /// Replace the global candidate list
    pub fn set_options(&mut self, options: Vec<MentionItem>) {
        self.defaults.options = options;
    }

    /// Install a dynamic candidate source for one trigger, or for all
    /// triggers without one when `trigger` is `None`
    pub fn set_provider(&mut self, trigger: Option<char>, provider: OptionProvider) {
        match trigger {
            Some(ch) => {
                self.providers.insert(ch, provider);
            }
            None => self.fallback_provider = Some(provider),
        }
    }

    /// Candidates for a trigger: dedicated options, then a provider, then global options
    pub fn options_for(&self, trigger: char, query: &str) -> Cow<'_, [MentionItem]> {
        if let Some(cfg) = self.configs.get(&trigger) {
            if !cfg.options.is_empty() {
                return Cow::Borrowed(&cfg.options);
            }
        }
        if let Some(provider) = self.providers.get(&trigger).or(self.fallback_provider.as_ref()) {
            return Cow::Owned((**provider)(query));
        }
        Cow::Borrowed(&self.defaults.options)
    }

    pub fn token_type_for(&self, trigger: char) -> TokenType {
        self.configs
            .get(&trigger)
            .and_then(|c| c.token_type)
            .unwrap_or(self.defaults.token_type)
    }

    pub fn closable_for(&self, trigger: char) -> bool {
        self.configs
            .get(&trigger)
            .and_then(|c| c.closable)
            .unwrap_or(self.defaults.closable)
    }

    /// Item overrides win over trigger config, which wins over defaults.
    /// Read-only surfaces never show closable tokens.
    pub fn appearance(&self, trigger: char, item: Option<&MentionItem>, read_only: bool) -> TokenAppearance {
        let token_type = item
            .and_then(|it| it.tag_type)
            .unwrap_or_else(|| self.token_type_for(trigger));
        let closable = !read_only
            && item
                .and_then(|it| it.closable)
                .unwrap_or_else(|| self.closable_for(trigger));
        TokenAppearance {
            token_type,
            closable,
        }
    }
}
