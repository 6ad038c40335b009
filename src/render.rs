//! Redraw policy for the input line.
//!
//! Every change to the visible line goes through [`RedrawPolicy::render`]:
//! clear the line, rewrite prompt and buffer, then walk the cursor back from
//! the end of the text to the logical cursor. The conversion between logical
//! offsets and terminal columns lives in [`Prompt`] and nowhere else.

use crate::ansi;
use crate::text::LineBuffer;
use std::fmt;
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// The prompt literal and its on-screen width.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Prompt {
    literal: String,
    width: usize,
}

impl Prompt {
    #[must_use]
    pub fn new(literal: impl Into<String>) -> Self {
        let literal = literal.into();
        let width = literal.width();
        Self { literal, width }
    }

    #[must_use]
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Display columns occupied by the prompt.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Terminal column of the cursor when `buffer` is drawn after the prompt.
    #[must_use]
    pub fn cursor_column(&self, buffer: &LineBuffer) -> usize {
        self.width + buffer.before_cursor().width()
    }

    /// Column where the first buffer character is drawn.
    #[must_use]
    pub fn first_column(&self) -> usize {
        self.width
    }

    /// Column just past the last buffer character.
    #[must_use]
    pub fn end_column(&self, buffer: &LineBuffer) -> usize {
        self.width + buffer.text().width()
    }
}

impl Default for Prompt {
    fn default() -> Self {
        Self::new(">>> ")
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}

/// The exact terminal writes for one redraw of the input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteInstruction {
    /// Prompt literal written after clearing the line.
    pub prompt: String,
    /// Buffer contents written after the prompt.
    pub text: String,
    /// Columns to move left after writing `text`.
    pub cursor_back: usize,
    /// Move one column right after repositioning.
    pub nudge_right: bool,
}

impl WriteInstruction {
    /// Encode as a single escape-sequence string.
    #[must_use]
    pub fn to_ansi(&self) -> String {
        let mut out = String::with_capacity(self.prompt.len() + self.text.len() + 16);
        out.push_str(ansi::CLEAR_LINE);
        out.push_str(ansi::CR);
        out.push_str(&self.prompt);
        out.push_str(&self.text);
        out.push_str(&ansi::cursor_left(self.cursor_back));
        if self.nudge_right {
            out.push_str(ansi::CURSOR_RIGHT);
        }
        out
    }

    /// Write the encoded instruction to `w`.
    pub fn write_to(&self, w: &mut impl Write) -> io::Result<()> {
        w.write_all(self.to_ansi().as_bytes())
    }
}

impl fmt::Display for WriteInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ansi())
    }
}

/// Computes what the input line should look like on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RedrawPolicy {
    /// Host cursor queries cannot tell "just after the prompt" from "just
    /// before the first character"; compensate after deletes at the edges.
    pub coarse_cursor_query: bool,
}

impl RedrawPolicy {
    #[must_use]
    pub fn new(coarse_cursor_query: bool) -> Self {
        Self {
            coarse_cursor_query,
        }
    }

    /// Redraw `buffer` after `prompt` with the cursor at its logical offset.
    #[must_use]
    pub fn render(&self, prompt: &Prompt, buffer: &LineBuffer) -> WriteInstruction {
        WriteInstruction {
            prompt: prompt.literal().to_string(),
            text: buffer.text().to_string(),
            cursor_back: buffer.after_cursor().width(),
            nudge_right: false,
        }
    }

    /// Redraw after a backspace.
    ///
    /// Identical to [`render`](Self::render) unless the host cursor query is
    /// coarse and the delete left the cursor on a line boundary, in which case
    /// the cursor is nudged one column right.
    #[must_use]
    pub fn render_after_delete(&self, prompt: &Prompt, buffer: &LineBuffer) -> WriteInstruction {
        let mut instruction = self.render(prompt, buffer);
        instruction.nudge_right =
            self.coarse_cursor_query && (buffer.at_start() || buffer.at_end());
        instruction
    }

    /// A bare prompt on the current line.
    #[must_use]
    pub fn render_empty(&self, prompt: &Prompt) -> WriteInstruction {
        self.render(prompt, &LineBuffer::new())
    }
}
