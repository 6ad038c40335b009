//! Terminal surface abstraction.
//!
//! The router only needs two things from a terminal: append text, and report
//! which column the cursor is on. [`TerminalSurface`] captures that, and
//! [`Terminal`] implements it over any [`Write`] by tracking the column from
//! the bytes it writes.

mod cursor;
mod raw;

pub use cursor::{CursorState, CursorStyle};
pub use raw::{READ_TIMEOUT_DECISECONDS, RawModeGuard, enable_raw_mode, is_tty, terminal_size};

use crate::ansi::sequences;
use std::io::{self, Write};

/// Minimal capability the line editor consumes from a terminal.
pub trait TerminalSurface {
    /// Append raw text and control sequences.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Current cursor column, 0-indexed.
    fn cursor_x(&self) -> usize;

    /// Push buffered output to the display.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: TerminalSurface + ?Sized> TerminalSurface for &mut T {
    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }

    fn cursor_x(&self) -> usize {
        (**self).cursor_x()
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Terminal state manager.
pub struct Terminal<W: Write> {
    writer: W,
    cursor: CursorState,
    raw_mode_guard: Option<RawModeGuard>,
}

impl<W: Write> Terminal<W> {
    /// Create a new terminal with the given writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            cursor: CursorState::new(),
            raw_mode_guard: None,
        }
    }

    /// Get the underlying writer.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Get mutable access to the underlying writer.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Check if terminal is in raw mode.
    #[must_use]
    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode_guard.is_some()
    }

    /// Enter raw mode on stdin.
    pub fn enter_raw_mode(&mut self) -> io::Result<()> {
        if self.raw_mode_guard.is_none() {
            self.raw_mode_guard = Some(enable_raw_mode()?);
        }
        Ok(())
    }

    /// Exit raw mode, restoring the original terminal settings.
    pub fn exit_raw_mode(&mut self) -> io::Result<()> {
        self.raw_mode_guard = None;
        Ok(())
    }

    /// Get cursor state.
    #[must_use]
    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    /// Set cursor style.
    pub fn set_cursor_style(&mut self, style: CursorStyle, blinking: bool) -> io::Result<()> {
        let seq = match (style, blinking) {
            (CursorStyle::Bar, true) => sequences::cursor_style::BAR_BLINK,
            _ => sequences::cursor_style::DEFAULT,
        };
        self.writer.write_all(seq.as_bytes())?;
        self.cursor.style = style;
        self.cursor.blinking = blinking;
        Ok(())
    }

    /// Reset attributes and cursor style.
    pub fn reset(&mut self) -> io::Result<()> {
        self.writer.write_all(sequences::RESET.as_bytes())?;
        self.writer
            .write_all(sequences::cursor_style::DEFAULT.as_bytes())?;
        Ok(())
    }

    /// Cleanup terminal on exit.
    pub fn cleanup(&mut self) -> io::Result<()> {
        self.reset()?;
        self.writer.write_all(sequences::CRLF.as_bytes())?;
        self.exit_raw_mode()?;
        self.writer.flush()
    }
}

impl<W: Write> TerminalSurface for Terminal<W> {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.cursor.advance(text);
        Ok(())
    }

    fn cursor_x(&self) -> usize {
        self.cursor.x
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<W: Write> Drop for Terminal<W> {
    fn drop(&mut self) {
        if self.is_raw_mode() {
            let _ = self.cleanup();
        }
    }
}
