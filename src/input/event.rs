//! Terminal event types.

use crate::input::keyboard::KeyEvent;

/// An input event delivered by the terminal host.
///
/// Hosts that can report structured keys deliver [`Event::Key`]. Hosts that
/// cannot (some mobile keyboards only ever report committed text) deliver
/// [`Event::Data`] chunks instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Keyboard event.
    Key(KeyEvent),
    /// Raw text chunk.
    Data(String),
}

impl Event {
    /// Check if this is a key event.
    #[must_use]
    pub fn is_key(&self) -> bool {
        matches!(self, Self::Key(_))
    }

    /// Check if this is a raw data chunk.
    #[must_use]
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    /// Get the key event if this is one.
    #[must_use]
    pub fn key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(e) => Some(e),
            Self::Data(_) => None,
        }
    }

    /// Get the data chunk if this is one.
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        match self {
            Self::Data(s) => Some(s),
            Self::Key(_) => None,
        }
    }
}

impl From<KeyEvent> for Event {
    fn from(e: KeyEvent) -> Self {
        Self::Key(e)
    }
}

impl From<&str> for Event {
    fn from(s: &str) -> Self {
        Self::Data(s.to_string())
    }
}

impl From<String> for Event {
    fn from(s: String) -> Self {
        Self::Data(s)
    }
}
