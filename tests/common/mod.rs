//! Shared helpers for integration tests.
//!
//! - [`ScriptedEngine`]: evaluator with canned replies that records calls.
//! - [`ScreenSurface`]: terminal surface backed by a `vt100` screen that also
//!   keeps every write, so tests can check both what was sent and what a
//!   real terminal would show.
//! - [`init_logging`]: routes the crate's log callback into `tracing`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::Once;
use term_repl::{EvalError, Evaluator, LogLevel, TerminalSurface, set_log_callback};
use tracing::Level;

pub const ROWS: u16 = 24;
pub const COLS: u16 = 80;

/// Install a `tracing` subscriber and forward library logs to it.
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_test_writer()
            .try_init();
        set_log_callback(|level, msg| match level {
            LogLevel::Debug => tracing::debug!(target: "term_repl", "{msg}"),
            LogLevel::Info => tracing::info!(target: "term_repl", "{msg}"),
            LogLevel::Warn => tracing::warn!(target: "term_repl", "{msg}"),
            LogLevel::Error => tracing::error!(target: "term_repl", "{msg}"),
        });
    });
}

/// Evaluator with fixed replies.
///
/// Commands without a reply echo back as `out:<command>`.
#[derive(Default)]
pub struct ScriptedEngine {
    replies: HashMap<String, Result<String, EvalError>>,
    banners: Option<(String, String)>,
    pub calls: Vec<String>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, command: &str, output: &str) -> Self {
        self.replies
            .insert(command.to_string(), Ok(output.to_string()));
        self
    }

    /// Replace the site description and version banners.
    pub fn banners(mut self, site: &str, version: &str) -> Self {
        self.banners = Some((site.to_string(), version.to_string()));
        self
    }

    pub fn fail(mut self, command: &str, error: EvalError) -> Self {
        self.replies.insert(command.to_string(), Err(error));
        self
    }
}

impl Evaluator for ScriptedEngine {
    fn lookup(&self, name: &str) -> Option<String> {
        if let Some((site, version)) = &self.banners {
            return match name {
                "version_string" => Some(version.clone()),
                "site_description_string" => Some(site.clone()),
                _ => None,
            };
        }
        match name {
            "version_string" => Some("scripted 1.0\n".to_string()),
            "site_description_string" => Some("Scripted REPL\n\n".to_string()),
            _ => None,
        }
    }

    fn execute(&mut self, command: &str) -> Result<String, EvalError> {
        self.calls.push(command.to_string());
        self.replies
            .get(command)
            .cloned()
            .unwrap_or_else(|| Ok(format!("out:{command}")))
    }
}

/// Terminal surface rendering into a virtual screen.
pub struct ScreenSurface {
    parser: vt100::Parser,
    cols: u16,
    pub writes: Vec<String>,
}

impl ScreenSurface {
    pub fn new() -> Self {
        Self::with_size(ROWS, COLS)
    }

    pub fn with_size(rows: u16, cols: u16) -> Self {
        Self {
            parser: vt100::Parser::new(rows, cols, 0),
            cols,
            writes: Vec::new(),
        }
    }

    pub fn screen(&self) -> &vt100::Screen {
        self.parser.screen()
    }

    /// Trimmed text of row `row`.
    pub fn row(&self, row: u16) -> String {
        self.screen()
            .rows(0, self.cols)
            .nth(usize::from(row))
            .unwrap_or_default()
            .trim_end()
            .to_string()
    }

    /// Full screen text.
    pub fn contents(&self) -> String {
        self.screen().contents()
    }

    /// Row the cursor is on.
    pub fn cursor_row(&self) -> u16 {
        self.screen().cursor_position().0
    }

    /// Text of the row the cursor is on.
    pub fn current_row(&self) -> String {
        self.row(self.cursor_row())
    }

    /// One debug-quoted write per line.
    pub fn transcript(&self) -> String {
        self.writes
            .iter()
            .map(|w| format!("{w:?}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl TerminalSurface for ScreenSurface {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.parser.process(text.as_bytes());
        self.writes.push(text.to_string());
        Ok(())
    }

    fn cursor_x(&self) -> usize {
        usize::from(self.screen().cursor_position().1)
    }
}
