//! `mention` command-line front end

use anyhow::{Context, Result};
use clap::Parser;

use mention::cli::{surface_with_caret, CliArgs, Command, ReplayScript, ScriptStep};
use mention::config::ValueFormat;
use mention::model::{plain_text, MentionModel};
use mention::parser::BatchParser;
use mention::scanner::scan_from_caret;
use mention::session::MentionSession;
use mention::update::update;

fn main() -> Result<()> {
    mention::tracing::init();

    let args = CliArgs::parse();
    tracing::debug!(?args, "starting");

    let base = args.base_config()?;
    let config = args.apply_overrides(base)?;

    match &args.command {
        Command::Parse { text, .. } => {
            let registry = config.registry();
            let segments = BatchParser::new(&registry, config.parse_strategy).parse(text);
            let json = match config.value_format {
                ValueFormat::Segments => serde_json::to_string_pretty(&segments)?,
                ValueFormat::Model => {
                    serde_json::to_string_pretty(&MentionModel::from_segments(&segments))?
                }
                ValueFormat::Text => serde_json::to_string(&plain_text(&segments))?,
            };
            println!("{}", json);
        }

        Command::Scan { text } => {
            let registry = config.registry();
            let (surface, caret) = surface_with_caret(text);
            let found = scan_from_caret(&surface, caret, &registry);
            println!("{}", serde_json::to_string_pretty(&found)?);
        }

        Command::Replay { script } => {
            let script = ReplayScript::load(script)?;
            let config = match script.config {
                Some(c) => args.apply_overrides(c)?,
                None => config,
            };
            let mut session = MentionSession::new(config);
            for msg in script.steps.into_iter().flat_map(ScriptStep::into_msgs) {
                for event in update(&mut session, msg) {
                    println!("{}", serde_json::to_string(&event)?);
                }
            }
            let value = serde_json::to_string(&session.value())?;
            println!("{}", value);
        }

        Command::LogPath => {
            let path = mention::config_paths::log_file().context("No config directory available")?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
