//! Command-line argument parsing for the mention tool
//!
//! Supports:
//! - Parsing text into segments or a mention model
//! - Scanning for the trigger before a caret marked with `|`
//! - Replaying a YAML script of input steps through a session

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use crate::config::{MentionConfig, ValueFormat};
use crate::messages::{CandidateMsg, CaretMsg, EditMsg, Key, Msg, ValueMsg};
use crate::model::{options_from_json, MentionItem};
use crate::parser::ParseStrategy;
use crate::surface::{CursorAnchor, Surface, SurfaceNode};
use crate::trigger::TriggersInput;

/// Caret marker accepted by `mention scan`
pub const CARET_MARKER: char = '|';

/// Mention token parser and caret-trigger engine
#[derive(Parser, Debug)]
#[command(name = "mention", version, about = "Mention token parser and caret-trigger engine")]
pub struct CliArgs {
    /// Config file (YAML, or JSON by extension); defaults to ~/.config/mention/config.yaml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Trigger characters, e.g. "@" or "@,#" or '["@","#"]'
    #[arg(long, global = true, value_name = "TRIGGERS")]
    pub triggers: Option<String>,

    /// JSON file holding the global candidate list
    #[arg(long, global = true, value_name = "FILE")]
    pub options: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse text and print the result as JSON
    Parse {
        text: String,
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
        #[arg(long, value_enum, default_value = "segments")]
        format: FormatArg,
    },
    /// Print the trigger match before the caret (`|` marks it) as JSON, or null
    Scan { text: String },
    /// Run a script of steps through a session, printing events as JSON lines
    Replay { script: PathBuf },
    /// Print the path of the current log file
    LogPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Label,
    Options,
}

impl From<StrategyArg> for ParseStrategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::Label => ParseStrategy::Label,
            StrategyArg::Options => ParseStrategy::Options,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Segments,
    Model,
    Text,
}

impl From<FormatArg> for ValueFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Segments => ValueFormat::Segments,
            FormatArg::Model => ValueFormat::Model,
            FormatArg::Text => ValueFormat::Text,
        }
    }
}

impl CliArgs {
    /// Base config: the explicit `--config` file, else the user config (or defaults)
    pub fn base_config(&self) -> anyhow::Result<MentionConfig> {
        match &self.config {
            Some(path) => MentionConfig::load_from(path),
            None => Ok(MentionConfig::load()),
        }
    }

    /// Apply command-line overrides on top of `config`
    pub fn apply_overrides(&self, mut config: MentionConfig) -> anyhow::Result<MentionConfig> {
        if let Some(triggers) = &self.triggers {
            config.triggers = Some(TriggersInput::One(triggers.clone()));
        }
        if let Some(path) = &self.options {
            config.options = read_options(path)?;
        }
        if let Command::Parse { strategy, format, .. } = &self.command {
            if let Some(s) = strategy {
                config.parse_strategy = (*s).into();
            }
            config.value_format = (*format).into();
        }
        Ok(config)
    }
}

fn read_options(path: &Path) -> anyhow::Result<Vec<MentionItem>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read options from {}", path.display()))?;
    Ok(options_from_json(&content))
}

/// Build a one-node surface from text with a `|` caret marker (caret at the end without one)
pub fn surface_with_caret(marked: &str) -> (Surface, CursorAnchor) {
    let caret = marked.chars().position(|c| c == CARET_MARKER);
    let text: String = marked.chars().filter(|c| *c != CARET_MARKER).collect();
    let len = text.chars().count();
    let surface = if text.is_empty() {
        Surface::new()
    } else {
        Surface::from_nodes(vec![SurfaceNode::text(text)])
    };
    let anchor = CursorAnchor::new(0, caret.unwrap_or(len));
    (surface, anchor)
}

/// A replay script: optional config plus the steps to feed through `update`
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub config: Option<MentionConfig>,
    pub steps: Vec<ScriptStep>,
}

impl ReplayScript {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse script {}", path.display()))
    }
}

/// One scripted input step
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Type text one char at a time
    Type { text: String },
    Paste { text: String },
    Key { key: Key },
    Caret { node: usize, offset: usize },
    Hover { index: usize },
    Pick { index: usize },
    SetValue { text: String },
    SetOptions { options: Vec<MentionItem> },
    SetLoading { loading: bool },
    CloseToken { node: usize },
    Reparse,
    Focus,
    Blur,
}

impl ScriptStep {
    pub fn into_msgs(self) -> Vec<Msg> {
        match self {
            ScriptStep::Type { text } => text
                .chars()
                .map(|c| Msg::Edit(EditMsg::InsertText(c.to_string())))
                .collect(),
            ScriptStep::Paste { text } => vec![EditMsg::Paste(text).into()],
            ScriptStep::Key { key } => vec![Msg::Key(key)],
            ScriptStep::Caret { node, offset } => {
                vec![CaretMsg::Set(CursorAnchor::new(node, offset)).into()]
            }
            ScriptStep::Hover { index } => vec![CandidateMsg::Hover(index).into()],
            ScriptStep::Pick { index } => vec![CandidateMsg::Select(index).into()],
            ScriptStep::SetValue { text } => vec![ValueMsg::SetValue(text).into()],
            ScriptStep::SetOptions { options } => vec![ValueMsg::SetOptions(options).into()],
            ScriptStep::SetLoading { loading } => vec![ValueMsg::SetLoading(loading).into()],
            ScriptStep::CloseToken { node } => vec![ValueMsg::CloseToken(node).into()],
            ScriptStep::Reparse => vec![ValueMsg::Reparse.into()],
            ScriptStep::Focus => vec![Msg::Focus],
            ScriptStep::Blur => vec![Msg::Blur],
        }
    }
}
