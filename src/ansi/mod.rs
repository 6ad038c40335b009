//! ANSI escape sequence generation.
//!
//! The line editor only needs a small control vocabulary: clear the current
//! line, return the carriage, move the cursor horizontally, and a couple of
//! SGR attributes for the startup banner.

pub mod sequences;

pub use sequences::*;

/// Move the cursor `n` columns left (`CSI n D`). Empty for `n == 0`.
#[must_use]
pub fn cursor_left(n: usize) -> String {
    if n == 0 {
        String::new()
    } else {
        format!("\x1b[{n}D")
    }
}

/// Move the cursor `n` columns right (`CSI n C`). Empty for `n == 0`.
#[must_use]
pub fn cursor_right(n: usize) -> String {
    if n == 0 {
        String::new()
    } else {
        format!("\x1b[{n}C")
    }
}

/// Convert bare `\n` line breaks to `\r\n`.
///
/// Raw-mode terminals do not return the carriage on line feed, so multi-line
/// output would otherwise drift right. Existing `\r\n` pairs are preserved.
#[must_use]
pub fn normalize_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev = '\0';
    for c in text.chars() {
        if c == '\n' && prev != '\r' {
            out.push('\r');
        }
        out.push(c);
        prev = c;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_motion() {
        // CSI 0 D would still move one column on most terminals
        assert_eq!(cursor_left(0), "");
        assert_eq!(cursor_right(0), "");
        assert_eq!(cursor_left(3), "\x1b[3D");
        assert_eq!(cursor_right(1), "\x1b[1C");
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\nb"), "a\r\nb");
        assert_eq!(normalize_newlines("a\r\nb"), "a\r\nb");
        assert_eq!(normalize_newlines("\n\n"), "\r\n\r\n");
        assert_eq!(normalize_newlines("plain"), "plain");
    }
}
