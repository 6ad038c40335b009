//! Session configuration.

use crate::mode::ModeOverride;
use crate::render::Prompt;
use std::time::Duration;

/// Prompt shown before every input line.
pub const DEFAULT_PROMPT: &str = ">>> ";

/// Command placed on the first input line so a single Enter shows something.
pub const DEFAULT_SEED_COMMAND: &str = "print(ABOUT) # press enter";

/// What a Tab keystroke inserts.
pub const DEFAULT_TAB_EXPANSION: &str = "    ";

/// Delay between evaluation-engine readiness probes.
pub const DEFAULT_READY_POLL_INTERVAL: Duration = Duration::from_millis(30);

/// Settings for one REPL session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplConfig {
    pub prompt: String,
    /// Pre-typed first command; `None` starts with an empty line.
    pub seed_command: Option<String>,
    pub tab_expansion: String,
    pub ready_poll_interval: Duration,
    /// Give up waiting for the engine after this long; `None` waits forever.
    pub ready_timeout: Option<Duration>,
    /// Compensate for hosts whose cursor query is off by one at line edges.
    pub coarse_cursor_query: bool,
    pub mode: ModeOverride,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            seed_command: Some(DEFAULT_SEED_COMMAND.to_string()),
            tab_expansion: DEFAULT_TAB_EXPANSION.to_string(),
            ready_poll_interval: DEFAULT_READY_POLL_INTERVAL,
            ready_timeout: None,
            coarse_cursor_query: false,
            mode: ModeOverride::Auto,
        }
    }
}

impl ReplConfig {
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn with_seed_command(mut self, seed: Option<String>) -> Self {
        self.seed_command = seed;
        self
    }

    #[must_use]
    pub fn with_ready_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.ready_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ModeOverride) -> Self {
        self.mode = mode;
        self
    }

    /// The configured prompt with its measured width.
    #[must_use]
    pub fn prompt(&self) -> Prompt {
        Prompt::new(self.prompt.clone())
    }
}
