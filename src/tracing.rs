//! Tracing setup and session snapshots for development diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=scanner=trace,trigger=debug` - scoped filtering
//! - `RUST_LOG=mention::parser=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/mention/logs/mention.log` with daily rotation,
//! at debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::session::MentionSession;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`) and goes to stderr so
/// JSON written to stdout stays clean.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {:#}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of session state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub caret: (usize, usize),
    pub collapsed: bool,
    pub node_count: usize,
    pub mention_count: usize,
    pub trigger: Option<(char, String)>,
    pub candidate_count: usize,
    pub highlighted: Option<usize>,
}

impl SessionSnapshot {
    pub fn from_session(session: &MentionSession) -> Self {
        let caret = session.surface.caret();
        Self {
            caret: (caret.node, caret.offset),
            collapsed: session.surface.is_collapsed(),
            node_count: session.surface.nodes().len(),
            mention_count: session.mentions().len(),
            trigger: session
                .trigger_ctx
                .as_ref()
                .map(|ctx| (ctx.trigger, ctx.query.clone())),
            candidate_count: session.candidates.items().len(),
            highlighted: session.candidates.highlighted(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SessionSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        if self.caret != other.caret {
            changes.push(format!(
                "caret: ({},{}) → ({},{})",
                self.caret.0, self.caret.1, other.caret.0, other.caret.1
            ));
        }
        if self.collapsed != other.collapsed {
            let status = if other.collapsed { "cleared" } else { "active" };
            changes.push(format!("selection {}", status));
        }
        if self.node_count != other.node_count {
            changes.push(format!("nodes: {} → {}", self.node_count, other.node_count));
        }
        if self.mention_count != other.mention_count {
            changes.push(format!(
                "mentions: {} → {}",
                self.mention_count, other.mention_count
            ));
        }
        match (&self.trigger, &other.trigger) {
            (None, Some((ch, q))) => changes.push(format!("trigger opened: {}{}", ch, q)),
            (Some(_), None) => changes.push("trigger closed".to_string()),
            (Some(a), Some(b)) if a != b => changes.push(format!("query: {:?} → {:?}", a.1, b.1)),
            _ => {}
        }
        if self.candidate_count != other.candidate_count || self.highlighted != other.highlighted {
            changes.push(format!(
                "candidates: {} ({:?}) → {} ({:?})",
                self.candidate_count, self.highlighted, other.candidate_count, other.highlighted
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
