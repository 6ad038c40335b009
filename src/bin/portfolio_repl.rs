//! `portfolio_repl` - interactive portfolio REPL in the terminal
//!
//! Loads a profile document, prints its banners and drops into a line editor
//! whose commands are evaluated by the profile engine.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin portfolio_repl
//! cargo run --bin portfolio_repl -- --help
//! cargo run --bin portfolio_repl -- --profile me.json --mode data
//! ```
//!
//! Press Ctrl+C, or Ctrl+D on an empty line, to quit.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use term_repl::input::{Event, InputParser, decode_chunk};
use term_repl::terminal::{CursorStyle, Terminal, is_tty, terminal_size};
use term_repl::{
    EventMode, InputRouter, LineBuffer, LogLevel, ModeOverride, ModeSelector, ProfileEngine,
    ProfileSource, ReplConfig, emit_log, session, set_log_callback,
};

// ============================================================================
// CLI Parsing
// ============================================================================

const HELP_TEXT: &str = "portfolio_repl - interactive portfolio REPL

USAGE:
    portfolio_repl [OPTIONS]

OPTIONS:
    -h, --help                Print this help message and exit
    --prompt <TEXT>           Prompt literal (default: \">>> \")
    --no-seed                 Start with an empty line instead of the demo command

    --mode <MODE>             Input mode: auto, key, data (default: auto)
    --user-agent <UA>         Platform string used by --mode auto
                              (default: $REPL_USER_AGENT)
    --coarse-cursor           Nudge the cursor after deletes at line edges

    --profile <PATH>          Profile JSON document (default: bundled sample)
    --ready-timeout-ms <N>    Give up if the profile takes longer than N ms
    --log <PATH>              Append diagnostics to PATH

EXAMPLES:
    portfolio_repl                        # Bundled sample profile
    portfolio_repl --profile me.json      # Your own profile
    portfolio_repl --mode data            # Text-chunk input only
";

/// Environment variable supplying a user agent when `--user-agent` is absent.
const USER_AGENT_ENV: &str = "REPL_USER_AGENT";

/// Parsed command-line configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub repl: ReplConfig,
    pub user_agent: Option<String>,
    pub profile: Option<PathBuf>,
    pub log: Option<PathBuf>,
}

/// Result of CLI parsing.
pub enum ParseResult {
    /// Successfully parsed configuration.
    Config(Config),
    /// User requested help.
    Help,
    /// Parse error with message.
    Error(String),
}

impl Config {
    /// Parse configuration from command-line arguments.
    pub fn from_args<I>(args: I) -> ParseResult
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        // Skip program name
        args.next();

        while let Some(arg) = args.next() {
            let arg_str = arg.to_string_lossy();

            match arg_str.as_ref() {
                "-h" | "--help" => return ParseResult::Help,

                "--no-seed" => config.repl.seed_command = None,
                "--coarse-cursor" => config.repl.coarse_cursor_query = true,

                "--prompt" => match args.next() {
                    Some(v) => config.repl.prompt = v.to_string_lossy().to_string(),
                    None => return ParseResult::Error("--prompt requires a value".to_string()),
                },

                "--mode" => {
                    let value = match args.next() {
                        Some(v) => v.to_string_lossy().to_string(),
                        None => return ParseResult::Error("--mode requires a value".to_string()),
                    };
                    match ModeOverride::from_str(&value) {
                        Some(mode) => config.repl.mode = mode,
                        None => {
                            return ParseResult::Error(format!(
                                "Invalid --mode value: {value} (expected auto, key or data)"
                            ));
                        }
                    }
                }

                "--user-agent" => match args.next() {
                    Some(v) => config.user_agent = Some(v.to_string_lossy().to_string()),
                    None => {
                        return ParseResult::Error("--user-agent requires a value".to_string());
                    }
                },

                "--profile" => match args.next() {
                    Some(v) => config.profile = Some(PathBuf::from(v)),
                    None => return ParseResult::Error("--profile requires a value".to_string()),
                },

                "--ready-timeout-ms" => {
                    let value = match args.next() {
                        Some(v) => v.to_string_lossy().to_string(),
                        None => {
                            return ParseResult::Error(
                                "--ready-timeout-ms requires a value".to_string(),
                            );
                        }
                    };
                    match value.parse::<u64>() {
                        Ok(ms) => config.repl.ready_timeout = Some(Duration::from_millis(ms)),
                        Err(_) => {
                            return ParseResult::Error(format!(
                                "Invalid --ready-timeout-ms value: {value}"
                            ));
                        }
                    }
                }

                "--log" => match args.next() {
                    Some(v) => config.log = Some(PathBuf::from(v)),
                    None => return ParseResult::Error("--log requires a value".to_string()),
                },

                other => {
                    return ParseResult::Error(format!("Unknown option: {other}"));
                }
            }
        }

        ParseResult::Config(config)
    }

    /// Fill unset values from the environment.
    #[must_use]
    pub fn with_env(mut self, user_agent: Option<String>) -> Self {
        if self.user_agent.is_none() {
            self.user_agent = user_agent;
        }
        self
    }

    fn event_mode(&self) -> EventMode {
        ModeSelector::new(self.repl.mode)
            .with_user_agent(self.user_agent.clone())
            .select()
    }

    fn profile_source(&self) -> ProfileSource {
        self.profile
            .clone()
            .map_or(ProfileSource::Sample, ProfileSource::File)
    }
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() {
    match Config::from_args(std::env::args_os()) {
        ParseResult::Config(config) => {
            let config = config.with_env(std::env::var(USER_AGENT_ENV).ok());
            if let Err(e) = run(&config) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        ParseResult::Help => {
            print!("{HELP_TEXT}");
        }
        ParseResult::Error(msg) => {
            eprintln!("Error: {msg}");
            eprintln!("Run with --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn install_log_file(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let file = Mutex::new(file);
    set_log_callback(move |level, msg| {
        if let Ok(mut f) = file.lock() {
            let _ = writeln!(f, "[{level}] {msg}");
        }
    });
    Ok(())
}

// ============================================================================
// Interactive Mode
// ============================================================================

/// Ctrl+C anywhere, or Ctrl+D on an empty line.
fn wants_exit(event: &Event, buffer: &LineBuffer) -> bool {
    match event {
        Event::Key(key) => key.is_ctrl_c() || (key.is_ctrl_d() && buffer.is_empty()),
        Event::Data(chunk) => chunk == "\x03" || (chunk == "\x04" && buffer.is_empty()),
    }
}

/// Drop a partial sequence that a read timeout left unfinished.
///
/// A lone ESC is the Escape key, which the editor ignores. Any longer tail
/// (`ESC [`, a truncated UTF-8 character) will never complete, and keeping it
/// would swallow the next keystroke.
fn discard_stalled(pending: &mut Vec<u8>) {
    if pending.len() > 1 {
        emit_log(
            LogLevel::Debug,
            &format!("discarding stalled input {pending:?}"),
        );
    }
    pending.clear();
}

fn run(config: &Config) -> term_repl::Result<()> {
    if !is_tty(&io::stdout()) || !is_tty(&io::stdin()) {
        eprintln!("Error: stdin and stdout must be a terminal");
        eprintln!();
        eprintln!("portfolio_repl requires an interactive terminal to run.");
        std::process::exit(1);
    }

    if let Some(path) = &config.log {
        install_log_file(path)?;
    }

    let mode = config.event_mode();
    emit_log(LogLevel::Info, &format!("starting in {mode} mode"));
    match terminal_size() {
        // Column tracking assumes the input line never wraps
        Ok((cols, rows)) => emit_log(LogLevel::Debug, &format!("terminal is {cols}x{rows}")),
        Err(e) => emit_log(LogLevel::Warn, &format!("terminal size unavailable: {e}")),
    }

    let engine = ProfileEngine::spawn(config.profile_source());
    let mut terminal = Terminal::new(io::stdout());
    terminal.enter_raw_mode()?;
    terminal.set_cursor_style(CursorStyle::Bar, true)?;

    let mut router = InputRouter::new(terminal, engine, &config.repl, mode);
    session::start(&mut router, &config.repl)?;

    let stdin = io::stdin();
    let mut stdin = stdin.lock();
    let mut parser = InputParser::new();
    let mut pending: Vec<u8> = Vec::new();
    let mut buf = [0u8; 1024];

    loop {
        let n = match stdin.read(&mut buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        if n == 0 {
            discard_stalled(&mut pending);
            continue;
        }

        let events = match mode {
            EventMode::Key => {
                pending.extend_from_slice(&buf[..n]);
                let (events, consumed) = parser.parse_all(&pending);
                pending.drain(..consumed);
                events
            }
            EventMode::Data => decode_chunk(&buf[..n]).into_iter().collect(),
        };

        for event in events {
            if wants_exit(&event, router.buffer()) {
                emit_log(LogLevel::Info, "exit requested");
                return Ok(());
            }
            router.handle(&event)?;
        }
    }
}
