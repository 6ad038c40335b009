//! Keyboard event types.
//!
//! Only keys a line editor can act on, or must deliberately ignore, are
//! modelled. Anything the decoder cannot name never becomes a [`KeyEvent`].

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        /// Shift key.
        const SHIFT = 0b0000_0001;
        /// Alt/Option key.
        const ALT = 0b0000_0010;
        /// Control key.
        const CTRL = 0b0000_0100;
        /// Super/Windows/Command key.
        const SUPER = 0b0000_1000;
        /// AltGr (right Alt on international layouts).
        const ALT_GRAPH = 0b0001_0000;
        /// Meta key (distinct from Alt on some systems).
        const META = 0b0010_0000;
    }
}

impl KeyModifiers {
    /// Modifiers that turn a character key into a shortcut rather than text.
    ///
    /// Shift is not included: it only selects which character is typed.
    pub const SHORTCUT: Self = Self::ALT
        .union(Self::ALT_GRAPH)
        .union(Self::CTRL)
        .union(Self::META)
        .union(Self::SUPER);
}

/// A key code representing a keyboard key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Backspace key.
    Backspace,
    /// Enter/Return key.
    Enter,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
    /// Tab key.
    Tab,
    /// Shift+Tab (backtab).
    BackTab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Function key (F1-F20).
    F(u8),
    /// A character key (includes space).
    Char(char),
    /// Escape key.
    Esc,
    /// Null (Ctrl+Space or Ctrl+@).
    Null,
}

/// A keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code.
    pub code: KeyCode,
    /// Modifier keys held.
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// Create a new key event.
    #[must_use]
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a key event with no modifiers.
    #[must_use]
    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Create a character key event.
    #[must_use]
    pub fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }

    /// Create a Ctrl+key event.
    #[must_use]
    pub fn with_ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CTRL)
    }

    /// Create an Alt+key event.
    #[must_use]
    pub fn with_alt(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::ALT)
    }

    /// Check if Ctrl is held.
    #[must_use]
    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(KeyModifiers::CTRL)
    }

    /// Check if Alt is held.
    #[must_use]
    pub fn alt(&self) -> bool {
        self.modifiers.contains(KeyModifiers::ALT)
    }

    /// Check if any shortcut modifier (alt, alt-graph, ctrl, meta, super) is held.
    #[must_use]
    pub fn has_shortcut_modifier(&self) -> bool {
        self.modifiers.intersects(KeyModifiers::SHORTCUT)
    }

    /// Check if this matches a specific key with optional modifiers.
    #[must_use]
    pub fn matches(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.code == code && self.modifiers == modifiers
    }

    /// Check if this is Ctrl+C.
    #[must_use]
    pub fn is_ctrl_c(&self) -> bool {
        self.matches(KeyCode::Char('c'), KeyModifiers::CTRL)
    }

    /// Check if this is Ctrl+D.
    #[must_use]
    pub fn is_ctrl_d(&self) -> bool {
        self.matches(KeyCode::Char('d'), KeyModifiers::CTRL)
    }

    /// Check if this is Enter.
    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.code == KeyCode::Enter
    }
}

impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        Self::char(c)
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::key(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_event_creation() {
        let event = KeyEvent::char('a');
        assert_eq!(event.code, KeyCode::Char('a'));
        assert!(event.modifiers.is_empty());
    }

    #[test]
    fn test_key_event_modifiers() {
        let event = KeyEvent::with_ctrl(KeyCode::Char('c'));
        assert!(event.ctrl());
        assert!(!event.alt());
        assert!(event.is_ctrl_c());
        assert!(event.has_shortcut_modifier());
    }

    #[test]
    fn test_shift_is_not_a_shortcut() {
        let event = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert!(!event.has_shortcut_modifier());

        for m in [
            KeyModifiers::ALT,
            KeyModifiers::ALT_GRAPH,
            KeyModifiers::META,
            KeyModifiers::SUPER,
        ] {
            assert!(KeyEvent::new(KeyCode::Char('x'), m).has_shortcut_modifier());
        }
    }

    #[test]
    fn test_key_event_from_char() {
        let event: KeyEvent = 'z'.into();
        assert_eq!(event.code, KeyCode::Char('z'));
    }
}
