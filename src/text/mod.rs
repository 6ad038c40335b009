//! Command-line text editing.
//!
//! [`LineBuffer`] holds the line being typed and its logical cursor. Edits are
//! pure value transitions, which keeps the editing rules testable without any
//! terminal attached.
//!
//! # Examples
//!
//! ```
//! use term_repl::LineBuffer;
//!
//! let buf = LineBuffer::new().insert_at(0, "1+1").unwrap();
//! assert_eq!(buf.cursor(), 3);
//!
//! let buf = buf.move_cursor(-1).insert("0");
//! assert_eq!(buf.text(), "1+01");
//!
//! let buf = buf.backspace();
//! assert_eq!(buf.text(), "1+1");
//! ```

mod line_buffer;

pub use line_buffer::LineBuffer;
