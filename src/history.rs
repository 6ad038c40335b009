//! Session command history.
//!
//! Entries are kept oldest first and only ever appended; browsing moves a
//! cursor over them without touching the entries themselves. Nothing is
//! persisted: history lives as long as the session.

use crate::error::{Error, Result};

/// Result of stepping forward through history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recall<'a> {
    /// A previously submitted command.
    Entry(&'a str),
    /// Stepped past the newest entry: show an empty live line.
    Live,
}

/// Previously submitted commands plus a browse cursor.
///
/// `browse_cursor == len()` means the user is on the live line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    browse_cursor: usize,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from existing entries, positioned on the live line.
    ///
    /// Blank entries are skipped.
    #[must_use]
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries
            .into_iter()
            .map(Into::into)
            .filter(|e| !e.trim().is_empty())
            .collect();
        let browse_cursor = entries.len();
        Self {
            entries,
            browse_cursor,
        }
    }

    /// Record a submitted command and return to the live line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `command` is empty or whitespace only.
    pub fn push(&mut self, command: &str) -> Result<()> {
        if command.trim().is_empty() {
            return Err(Error::Validation(
                "cannot record a blank command".to_string(),
            ));
        }
        self.entries.push(command.to_string());
        self.browse_cursor = self.entries.len();
        Ok(())
    }

    /// Step toward older entries.
    ///
    /// Clamps at the oldest entry: stepping back from it returns it again.
    /// Returns `None` only when there is no history at all.
    pub fn step_back(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        if self.browse_cursor > 0 {
            self.browse_cursor -= 1;
        }
        let idx = self.browse_cursor.min(self.entries.len() - 1);
        Some(&self.entries[idx])
    }

    /// Step toward newer entries.
    ///
    /// Reaching the end yields [`Recall::Live`] and parks the cursor on the
    /// newest entry, so the next [`step_back`](Self::step_back) moves to the
    /// one before it.
    pub fn step_forward(&mut self) -> Recall<'_> {
        let next = self.browse_cursor + 1;
        if next >= self.entries.len() {
            self.browse_cursor = self.entries.len().saturating_sub(1);
            return Recall::Live;
        }
        self.browse_cursor = next;
        Recall::Entry(&self.entries[next])
    }

    /// True when not browsing.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.browse_cursor == self.entries.len()
    }

    #[must_use]
    pub fn browse_cursor(&self) -> usize {
        self.browse_cursor
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }
}
