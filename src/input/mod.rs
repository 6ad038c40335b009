//! Input decoding for terminal events.
//!
//! Raw bytes from the terminal become either structured [`KeyEvent`]s
//! (key-event mode) or plain text chunks (data mode), both wrapped in
//! [`Event`].

mod event;
mod keyboard;
mod parser;

pub use event::Event;
pub use keyboard::{KeyCode, KeyEvent, KeyModifiers};
pub use parser::{InputParser, ParseError, ParseResult, decode_chunk};
