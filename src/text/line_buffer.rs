//! Single-line input buffer with a logical cursor.
//!
//! [`LineBuffer`] is a value type: every edit returns a new buffer and leaves
//! the original untouched, so sequences of edits can be replayed and compared
//! without a terminal. Offsets count characters (Unicode scalar values), not
//! bytes and not terminal columns.

use crate::error::{Error, Result};
use std::fmt;

/// The uncommitted command line and its insertion point.
///
/// Invariant: `0 <= cursor <= char_len(text)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LineBuffer {
    text: String,
    cursor: usize,
    len: usize,
}

impl LineBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `text` with the cursor at its end.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let len = text.chars().count();
        Self {
            text: text.to_string(),
            cursor: len,
            len,
        }
    }

    /// The buffer contents.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Logical cursor offset, in characters from the start.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when the contents are empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    #[must_use]
    pub fn at_start(&self) -> bool {
        self.cursor == 0
    }

    #[must_use]
    pub fn at_end(&self) -> bool {
        self.cursor == self.len
    }

    /// Text before the cursor.
    #[must_use]
    pub fn before_cursor(&self) -> &str {
        &self.text[..self.byte_index(self.cursor)]
    }

    /// Text from the cursor to the end.
    #[must_use]
    pub fn after_cursor(&self) -> &str {
        &self.text[self.byte_index(self.cursor)..]
    }

    /// Character immediately before the cursor, if any.
    #[must_use]
    pub fn char_before_cursor(&self) -> Option<char> {
        self.before_cursor().chars().next_back()
    }

    /// Character under the cursor, if any.
    #[must_use]
    pub fn char_at_cursor(&self) -> Option<char> {
        self.after_cursor().chars().next()
    }

    /// Splice `text` in at `offset` and leave the cursor just after it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `offset` is past the end of the buffer.
    pub fn insert_at(&self, offset: usize, text: &str) -> Result<Self> {
        self.check_offset(offset)?;
        let at = self.byte_index(offset);
        let inserted = text.chars().count();

        let mut new_text = String::with_capacity(self.text.len() + text.len());
        new_text.push_str(&self.text[..at]);
        new_text.push_str(text);
        new_text.push_str(&self.text[at..]);

        Ok(Self {
            text: new_text,
            cursor: offset + inserted,
            len: self.len + inserted,
        })
    }

    /// Insert at the current cursor.
    #[must_use]
    pub fn insert(&self, text: &str) -> Self {
        let mut next = self.clone();
        let at = self.byte_index(self.cursor);
        next.text.insert_str(at, text);
        let inserted = text.chars().count();
        next.cursor += inserted;
        next.len += inserted;
        next
    }

    /// Remove the character before `offset` and leave the cursor where it was.
    ///
    /// `offset == 0` returns the buffer unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `offset` is past the end of the buffer.
    pub fn delete_before(&self, offset: usize) -> Result<Self> {
        self.check_offset(offset)?;
        if offset == 0 {
            return Ok(self.clone());
        }

        let start = self.byte_index(offset - 1);
        let end = self.byte_index(offset);
        let mut new_text = String::with_capacity(self.text.len());
        new_text.push_str(&self.text[..start]);
        new_text.push_str(&self.text[end..]);

        Ok(Self {
            text: new_text,
            cursor: offset - 1,
            len: self.len - 1,
        })
    }

    /// Backspace at the current cursor.
    #[must_use]
    pub fn backspace(&self) -> Self {
        // cursor is always in range
        self.delete_before(self.cursor)
            .unwrap_or_else(|_| self.clone())
    }

    /// Replace the whole contents; the cursor moves to the end.
    #[must_use]
    pub fn replace(&self, text: &str) -> Self {
        Self::with_text(text)
    }

    /// Move the cursor by `delta` characters, clamped to `[0, len]`.
    #[must_use]
    pub fn move_cursor(&self, delta: isize) -> Self {
        let target = self.cursor.saturating_add_signed(delta).min(self.len);
        Self {
            cursor: target,
            ..self.clone()
        }
    }

    fn check_offset(&self, offset: usize) -> Result<()> {
        if offset > self.len {
            return Err(Error::OutOfRange {
                offset,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Byte index of the character at `offset` (or `text.len()` at the end).
    fn byte_index(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

impl fmt::Display for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for LineBuffer {
    fn from(text: &str) -> Self {
        Self::with_text(text)
    }
}
