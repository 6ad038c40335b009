//! Cursor state and column tracking.

use unicode_width::UnicodeWidthChar;

/// Cursor shape style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorStyle {
    /// Block cursor.
    #[default]
    Block,
    /// Vertical bar cursor.
    Bar,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Scan {
    #[default]
    Text,
    /// Saw ESC.
    Escape,
    /// Inside `ESC [`, accumulating a numeric parameter.
    Csi(Option<usize>),
}

/// Cursor state, tracked from the bytes written to the terminal.
///
/// Only horizontal position on the current line is modelled. Text is
/// assumed not to wrap past the right margin.
#[derive(Clone, Copy, Debug, Default)]
pub struct CursorState {
    /// Column, 0-indexed.
    pub x: usize,
    /// Whether cursor is visible.
    pub visible: bool,
    /// Cursor style.
    pub style: CursorStyle,
    /// Whether cursor is blinking.
    pub blinking: bool,
    scan: Scan,
}

impl CursorState {
    /// Create a visible block cursor at column 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            visible: true,
            blinking: true,
            ..Self::default()
        }
    }

    /// Update the column for `text` having been written.
    ///
    /// Understands carriage return, backspace, tab stops every 8 columns,
    /// and the CSI cursor motions `C`, `D` and `G`. Other CSI sequences
    /// (erase, SGR) leave the column unchanged. Escape state carries across
    /// calls so sequences split between writes are handled.
    pub fn advance(&mut self, text: &str) {
        for c in text.chars() {
            self.scan = match self.scan {
                Scan::Text => self.text_char(c),
                Scan::Escape => {
                    if c == '[' {
                        Scan::Csi(None)
                    } else {
                        Scan::Text
                    }
                }
                Scan::Csi(param) => self.csi_char(param, c),
            };
        }
    }

    fn text_char(&mut self, c: char) -> Scan {
        match c {
            '\x1b' => return Scan::Escape,
            '\r' => self.x = 0,
            '\x08' => self.x = self.x.saturating_sub(1),
            '\t' => self.x = (self.x / 8 + 1) * 8,
            c if c.is_control() => {}
            c => self.x += c.width().unwrap_or(0),
        }
        Scan::Text
    }

    fn csi_char(&mut self, param: Option<usize>, c: char) -> Scan {
        if let Some(digit) = c.to_digit(10) {
            let value = param.unwrap_or(0) * 10 + digit as usize;
            return Scan::Csi(Some(value));
        }
        if ('\x40'..='\x7e').contains(&c) {
            // A missing or zero count means one column.
            let n = param.unwrap_or(1).max(1);
            match c {
                'C' => self.x += n,
                'D' => self.x = self.x.saturating_sub(n),
                'G' => self.x = n - 1,
                _ => {}
            }
            return Scan::Text;
        }
        // Intermediate or parameter separator bytes (`;`, `?`, ` `).
        Scan::Csi(if c == ';' { None } else { param })
    }
}
