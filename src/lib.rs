//! `term_repl` - line editor for a terminal read-eval-print loop
//!
//! Owns the editable command line, its history and the redraw logic, and
//! hands submitted commands to a pluggable evaluation engine. Input arrives
//! either as structured key events or, on hosts that cannot deliver those,
//! as raw text chunks.
//!
//! ```
//! use term_repl::{Event, EventMode, InputRouter, KeyEvent, KeyCode, ReplConfig, Terminal};
//! use term_repl::engine::{Interpreter, Evaluator};
//! use term_repl::EvalError;
//!
//! struct Calc(Interpreter);
//!
//! impl Evaluator for Calc {
//!     fn lookup(&self, name: &str) -> Option<String> {
//!         self.0.get(name).map(|v| v.to_display())
//!     }
//!     fn execute(&mut self, command: &str) -> Result<String, EvalError> {
//!         self.0.execute(command).map(|out| out.trim_end().to_string())
//!     }
//! }
//!
//! let config = ReplConfig::default();
//! let mut router = InputRouter::new(
//!     Terminal::new(Vec::new()),
//!     Calc(Interpreter::new()),
//!     &config,
//!     EventMode::Key,
//! );
//! for c in "6*7".chars() {
//!     router.handle(&Event::Key(KeyEvent::char(c))).unwrap();
//! }
//! router.handle(&Event::Key(KeyEvent::key(KeyCode::Enter))).unwrap();
//! assert_eq!(router.history().entries(), ["6*7"]);
//! ```

// Crate-level lint configuration
#![warn(unsafe_code)] // Unsafe code needs justification (required for termios FFI)
#![allow(clippy::cast_possible_truncation)] // Intentional width casts
#![allow(clippy::cast_sign_loss)] // Intentional width conversions
#![allow(clippy::cast_precision_loss)] // Intentional for int-to-float arithmetic
#![allow(clippy::cast_possible_wrap)] // Intentional length conversions
#![allow(clippy::module_name_repetitions)] // Allow input::InputParser etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::format_push_string)] // format! with push_str is fine
#![allow(clippy::needless_pass_by_value)] // Allow pass by value for small Copy types
#![allow(clippy::should_implement_trait)] // from_str naming is intentional
#![allow(clippy::float_cmp)] // Exact zero checks for division
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference

pub mod ansi;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod history;
pub mod input;
pub mod mode;
pub mod render;
pub mod router;
pub mod session;
pub mod terminal;
pub mod text;

// Re-export core types at crate root
pub use config::ReplConfig;
pub use error::{Error, EvalError, Result};
pub use event::{LogLevel, clear_log_callback, emit_log, set_log_callback};
pub use history::{History, Recall};
pub use render::{Prompt, RedrawPolicy, WriteInstruction};
pub use router::{InputRouter, LineAction};
pub use text::LineBuffer;

// Re-export input types
pub use input::{Event, InputParser, KeyCode, KeyEvent, KeyModifiers};

// Re-export engine and environment types
pub use engine::{Evaluator, ProfileEngine, ProfileSource, wait_until_ready};
pub use mode::{EventMode, ModeOverride, ModeSelector};
pub use terminal::{RawModeGuard, Terminal, TerminalSurface, enable_raw_mode, is_tty, terminal_size};
