//! Event-mode selection.
//!
//! Some hosts, notably mobile browsers' on-screen keyboards, never deliver
//! usable key codes and only report committed text. Those sessions run the
//! router in [`EventMode::Data`]; everything else uses [`EventMode::Key`].

use std::fmt;

/// User-agent fragments identifying hosts without reliable key events.
pub const DATA_MODE_PLATFORMS: &[&str] = &["android", "webos", "iphone", "ipad", "ipod", "blackberry"];

/// How the router receives input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EventMode {
    /// Structured key events with key codes and modifiers.
    #[default]
    Key,
    /// Raw text chunks only.
    Data,
}

impl fmt::Display for EventMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key => f.write_str("key"),
            Self::Data => f.write_str("data"),
        }
    }
}

/// Explicit choice overriding platform detection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ModeOverride {
    #[default]
    Auto,
    Key,
    Data,
}

impl ModeOverride {
    /// Parse `auto`, `key` or `data` (case-insensitive).
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "key" | "keys" => Some(Self::Key),
            "data" | "raw" => Some(Self::Data),
            _ => None,
        }
    }
}

/// Chooses the event mode once, at startup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModeSelector {
    user_agent: Option<String>,
    preference: ModeOverride,
}

impl ModeSelector {
    #[must_use]
    pub fn new(preference: ModeOverride) -> Self {
        Self {
            user_agent: None,
            preference,
        }
    }

    /// Detect from a user-agent string.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        Self {
            user_agent: Some(user_agent.to_string()),
            preference: ModeOverride::Auto,
        }
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    #[must_use]
    pub fn with_preference(mut self, preference: ModeOverride) -> Self {
        self.preference = preference;
        self
    }

    /// The selected mode.
    #[must_use]
    pub fn select(&self) -> EventMode {
        match self.preference {
            ModeOverride::Key => EventMode::Key,
            ModeOverride::Data => EventMode::Data,
            ModeOverride::Auto => match self.user_agent.as_deref() {
                Some(ua) if lacks_key_events(ua) => EventMode::Data,
                _ => EventMode::Key,
            },
        }
    }
}

/// True when `user_agent` names a platform that only reports text input.
#[must_use]
pub fn lacks_key_events(user_agent: &str) -> bool {
    let ua = user_agent.to_lowercase();
    DATA_MODE_PLATFORMS.iter().any(|p| ua.contains(p))
}
