//! Constant ANSI escape sequences.

/// Reset all attributes to default.
pub const RESET: &str = "\x1b[0m";

/// Bold text.
pub const BOLD: &str = "\x1b[1m";

/// Bright green foreground.
pub const FG_BRIGHT_GREEN: &str = "\x1b[92m";

/// Clear entire line.
pub const CLEAR_LINE: &str = "\x1b[2K";

/// Carriage return.
pub const CR: &str = "\r";

/// Line break that also returns the carriage (raw mode has no output
/// post-processing).
pub const CRLF: &str = "\r\n";

/// Move cursor one column right.
pub const CURSOR_RIGHT: &str = "\x1b[C";

/// Cursor style constants.
pub mod cursor_style {
    /// Bar cursor (blinking).
    pub const BAR_BLINK: &str = "\x1b[5 q";
    /// Default cursor style.
    pub const DEFAULT: &str = "\x1b[0 q";
}
