//! ANSI sequence parser for terminal input.
//!
//! Parses raw bytes from the terminal into key events. Supports:
//! - Printable ASCII and multi-byte UTF-8 characters
//! - C0 control characters (Enter, Tab, Backspace, Ctrl+letter)
//! - CSI sequences with xterm modifier parameters (arrows, Home/End, tilde keys)
//! - SS3 sequences (application cursor keys, F1-F4)
//! - Alt+key as `ESC <char>`

// Self is used for consistency with other methods even when not needed
#![allow(clippy::unused_self)]
// Result wrapping is for consistency in the parsing API
#![allow(clippy::unnecessary_wraps)]

use crate::input::event::Event;
use crate::input::keyboard::{KeyCode, KeyEvent, KeyModifiers};

/// Error type for input parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Input buffer is empty.
    Empty,
    /// Incomplete escape sequence (need more bytes).
    Incomplete,
    /// Unrecognized escape sequence.
    UnrecognizedSequence(Vec<u8>),
    /// Invalid UTF-8 in input.
    InvalidUtf8,
}

/// Result of parsing input.
pub type ParseResult = Result<(Event, usize), ParseError>;

/// Parser for key-event mode.
///
/// Stateless between calls: every call consumes at most one key from the
/// front of `input`.
#[derive(Clone, Debug, Default)]
pub struct InputParser;

impl InputParser {
    /// Create a new input parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse bytes into an event.
    ///
    /// Returns the event and number of bytes consumed, or an error.
    /// Call repeatedly with the remaining buffer until `Err(ParseError::Empty)`
    /// or `Err(ParseError::Incomplete)` is returned.
    pub fn parse(&mut self, input: &[u8]) -> ParseResult {
        if input.is_empty() {
            return Err(ParseError::Empty);
        }

        let first = input[0];

        match first {
            0x1b => self.parse_escape(input),
            0x00 => Ok((KeyEvent::key(KeyCode::Null).into(), 1)),
            b'\r' | b'\n' => Ok((KeyEvent::key(KeyCode::Enter).into(), 1)),
            b'\t' => Ok((KeyEvent::key(KeyCode::Tab).into(), 1)),
            0x08 | 0x7f => Ok((KeyEvent::key(KeyCode::Backspace).into(), 1)),
            0x01..=0x1a => {
                // Ctrl+A through Ctrl+Z
                let c = (first - 1 + b'a') as char;
                Ok((KeyEvent::with_ctrl(KeyCode::Char(c)).into(), 1))
            }
            0x1c..=0x1f => {
                // Ctrl+\ Ctrl+] Ctrl+^ Ctrl+_
                let c = (first - 0x1c + b'\\') as char;
                Ok((KeyEvent::with_ctrl(KeyCode::Char(c)).into(), 1))
            }
            0x20..=0x7e => Ok((KeyEvent::char(first as char).into(), 1)),
            0x80..=0xff => self.parse_utf8(input),
        }
    }

    /// Parse every complete key in `input`.
    ///
    /// Returns the events and the number of bytes consumed. Unrecognized
    /// sequences and stray bytes are skipped; an incomplete trailing sequence
    /// is left unconsumed so the caller can prepend it to the next read.
    pub fn parse_all(&mut self, input: &[u8]) -> (Vec<Event>, usize) {
        let mut events = Vec::new();
        let mut offset = 0;

        while offset < input.len() {
            match self.parse(&input[offset..]) {
                Ok((event, consumed)) => {
                    events.push(event);
                    offset += consumed.max(1);
                }
                Err(ParseError::Empty | ParseError::Incomplete) => break,
                Err(ParseError::UnrecognizedSequence(seq)) => {
                    offset += seq.len().max(1);
                }
                Err(ParseError::InvalidUtf8) => offset += 1,
            }
        }

        (events, offset)
    }

    /// Parse an escape sequence.
    fn parse_escape(&mut self, input: &[u8]) -> ParseResult {
        if input.len() == 1 {
            // Could be just Escape or start of sequence
            return Err(ParseError::Incomplete);
        }

        match input[1] {
            // CSI sequence: ESC [
            b'[' => self.parse_csi(input),
            // SS3 sequence: ESC O
            b'O' => self.parse_ss3(input),
            // Alt+key: ESC <char>
            0x20..=0x7e => {
                let c = input[1] as char;
                Ok((KeyEvent::with_alt(KeyCode::Char(c)).into(), 2))
            }
            // Alt+Enter, Alt+Backspace
            b'\r' => Ok((KeyEvent::with_alt(KeyCode::Enter).into(), 2)),
            0x7f => Ok((KeyEvent::with_alt(KeyCode::Backspace).into(), 2)),
            _ => Ok((KeyEvent::key(KeyCode::Esc).into(), 1)),
        }
    }

    /// Parse a CSI sequence (ESC [ ...).
    fn parse_csi(&mut self, input: &[u8]) -> ParseResult {
        if input.len() < 3 {
            return Err(ParseError::Incomplete);
        }

        // Find the final byte (0x40-0x7e)
        let mut end = 2;
        while end < input.len() {
            let b = input[end];
            if (0x40..=0x7e).contains(&b) {
                break;
            }
            end += 1;
        }

        if end >= input.len() {
            return Err(ParseError::Incomplete);
        }

        let final_byte = input[end];
        let params = &input[2..end];

        match final_byte {
            b'A' => self.parse_modified_key(params, KeyCode::Up, end + 1),
            b'B' => self.parse_modified_key(params, KeyCode::Down, end + 1),
            b'C' => self.parse_modified_key(params, KeyCode::Right, end + 1),
            b'D' => self.parse_modified_key(params, KeyCode::Left, end + 1),
            b'H' => self.parse_modified_key(params, KeyCode::Home, end + 1),
            b'F' => self.parse_modified_key(params, KeyCode::End, end + 1),
            b'Z' => Ok((KeyEvent::key(KeyCode::BackTab).into(), end + 1)),
            b'~' => self.parse_tilde_key(&input[..=end], params, end + 1),
            _ => Err(ParseError::UnrecognizedSequence(input[..=end].to_vec())),
        }
    }

    /// Parse a key with modifiers from CSI params.
    fn parse_modified_key(&self, params: &[u8], base_key: KeyCode, consumed: usize) -> ParseResult {
        let modifiers = if params.is_empty() {
            KeyModifiers::empty()
        } else {
            self.parse_modifiers(params)?
        };
        Ok((KeyEvent::new(base_key, modifiers).into(), consumed))
    }

    /// Parse modifiers from CSI parameter bytes.
    ///
    /// Format is `1;N` where `N - 1` is a bitmask of
    /// shift (1), alt (2), ctrl (4) and meta (8).
    fn parse_modifiers(&self, params: &[u8]) -> Result<KeyModifiers, ParseError> {
        let s = std::str::from_utf8(params).map_err(|_| ParseError::InvalidUtf8)?;
        let mut parts = s.split(';');
        let _ = parts.next();
        let Some(n) = parts.next().and_then(|p| p.parse::<u8>().ok()) else {
            return Ok(KeyModifiers::empty());
        };

        let n = n.saturating_sub(1);
        let mut mods = KeyModifiers::empty();
        if n & 1 != 0 {
            mods |= KeyModifiers::SHIFT;
        }
        if n & 2 != 0 {
            mods |= KeyModifiers::ALT;
        }
        if n & 4 != 0 {
            mods |= KeyModifiers::CTRL;
        }
        if n & 8 != 0 {
            mods |= KeyModifiers::META;
        }
        Ok(mods)
    }

    /// Parse tilde key sequences (Insert, Delete, Page Up/Down, F5+).
    fn parse_tilde_key(&mut self, seq: &[u8], params: &[u8], consumed: usize) -> ParseResult {
        let s = std::str::from_utf8(params).map_err(|_| ParseError::InvalidUtf8)?;
        let num: u8 = s
            .split(';')
            .next()
            .and_then(|p| p.parse().ok())
            .unwrap_or(0);
        let modifiers = self.parse_modifiers(params)?;

        let code = match num {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            15 => KeyCode::F(5),
            17 => KeyCode::F(6),
            18 => KeyCode::F(7),
            19 => KeyCode::F(8),
            20 => KeyCode::F(9),
            21 => KeyCode::F(10),
            23 => KeyCode::F(11),
            24 => KeyCode::F(12),
            _ => return Err(ParseError::UnrecognizedSequence(seq.to_vec())),
        };

        Ok((KeyEvent::new(code, modifiers).into(), consumed))
    }

    /// Parse SS3 sequences (ESC O ...).
    fn parse_ss3(&mut self, input: &[u8]) -> ParseResult {
        if input.len() < 3 {
            return Err(ParseError::Incomplete);
        }

        let code = match input[2] {
            b'P' => KeyCode::F(1),
            b'Q' => KeyCode::F(2),
            b'R' => KeyCode::F(3),
            b'S' => KeyCode::F(4),
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            b'M' => KeyCode::Enter,
            _ => return Err(ParseError::UnrecognizedSequence(input[..3].to_vec())),
        };

        Ok((KeyEvent::key(code).into(), 3))
    }

    /// Parse a multi-byte UTF-8 character.
    fn parse_utf8(&self, input: &[u8]) -> ParseResult {
        let first = input[0];

        let expected_len = if first & 0b1110_0000 == 0b1100_0000 {
            2
        } else if first & 0b1111_0000 == 0b1110_0000 {
            3
        } else if first & 0b1111_1000 == 0b1111_0000 {
            4
        } else {
            return Err(ParseError::InvalidUtf8);
        };

        if input.len() < expected_len {
            return Err(ParseError::Incomplete);
        }

        let s = std::str::from_utf8(&input[..expected_len]).map_err(|_| ParseError::InvalidUtf8)?;
        let c = s.chars().next().ok_or(ParseError::InvalidUtf8)?;

        Ok((KeyEvent::char(c).into(), expected_len))
    }
}

/// Decode one raw read for data mode.
///
/// Data mode never interprets escape sequences, so the whole read becomes a
/// single text chunk. Invalid UTF-8 is replaced rather than rejected.
#[must_use]
pub fn decode_chunk(bytes: &[u8]) -> Option<Event> {
    if bytes.is_empty() {
        return None;
    }
    Some(Event::Data(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_char() {
        let mut parser = InputParser::new();
        let (event, consumed) = parser.parse(b"a").unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(event, Event::Key(KeyEvent::char('a')));
    }

    #[test]
    fn test_parse_enter_variants() {
        let mut parser = InputParser::new();
        for bytes in [&b"\r"[..], b"\n", b"\x1bOM"] {
            let (event, consumed) = parser.parse(bytes).unwrap();
            assert_eq!(consumed, bytes.len());
            assert!(event.key().unwrap().is_enter());
        }
    }

    #[test]
    fn test_parse_backspace_and_tab() {
        let mut parser = InputParser::new();
        let (event, _) = parser.parse(&[0x7f]).unwrap();
        assert_eq!(event.key().unwrap().code, KeyCode::Backspace);
        let (event, _) = parser.parse(&[0x08]).unwrap();
        assert_eq!(event.key().unwrap().code, KeyCode::Backspace);
        let (event, _) = parser.parse(b"\t").unwrap();
        assert_eq!(event.key().unwrap().code, KeyCode::Tab);
    }

    #[test]
    fn test_parse_ctrl_c() {
        let mut parser = InputParser::new();
        let (event, consumed) = parser.parse(&[0x03]).unwrap();
        assert_eq!(consumed, 1);
        assert!(event.key().unwrap().is_ctrl_c());
    }

    #[test]
    fn test_parse_escape() {
        let mut parser = InputParser::new();
        assert_eq!(parser.parse(b"\x1b"), Err(ParseError::Incomplete));
        assert_eq!(parser.parse(b"\x1b["), Err(ParseError::Incomplete));
        assert_eq!(parser.parse(b"\x1b[1;5"), Err(ParseError::Incomplete));
    }

    #[test]
    fn test_parse_arrows() {
        let mut parser = InputParser::new();
        let cases: [(&[u8], KeyCode); 4] = [
            (b"\x1b[A", KeyCode::Up),
            (b"\x1b[B", KeyCode::Down),
            (b"\x1b[C", KeyCode::Right),
            (b"\x1b[D", KeyCode::Left),
        ];
        for (bytes, code) in cases {
            let (event, consumed) = parser.parse(bytes).unwrap();
            assert_eq!(consumed, 3);
            assert_eq!(event.key().unwrap().code, code);
        }
    }

    #[test]
    fn test_parse_arrow_with_modifiers() {
        let mut parser = InputParser::new();
        // Ctrl+Left: ESC [ 1 ; 5 D
        let (event, consumed) = parser.parse(b"\x1b[1;5D").unwrap();
        assert_eq!(consumed, 6);
        let key = event.key().unwrap();
        assert_eq!(key.code, KeyCode::Left);
        assert!(key.ctrl());

        // Meta+Up: ESC [ 1 ; 9 A
        let (event, _) = parser.parse(b"\x1b[1;9A").unwrap();
        assert!(event.key().unwrap().modifiers.contains(KeyModifiers::META));
    }

    #[test]
    fn test_parse_delete() {
        let mut parser = InputParser::new();
        let (event, _) = parser.parse(b"\x1b[3~").unwrap();
        assert_eq!(event.key().unwrap().code, KeyCode::Delete);
    }

    #[test]
    fn test_parse_alt_key() {
        let mut parser = InputParser::new();
        let (event, consumed) = parser.parse(b"\x1bx").unwrap();
        assert_eq!(consumed, 2);
        let key = event.key().unwrap();
        assert_eq!(key.code, KeyCode::Char('x'));
        assert!(key.alt());
    }

    #[test]
    fn test_parse_utf8() {
        let mut parser = InputParser::new();
        let (event, consumed) = parser.parse("é".as_bytes()).unwrap();
        assert_eq!(consumed, 2);
        assert_eq!(event.key().unwrap().code, KeyCode::Char('é'));

        let (event, consumed) = parser.parse("中".as_bytes()).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(event.key().unwrap().code, KeyCode::Char('中'));

        assert_eq!(parser.parse(&[0xe4, 0xb8]), Err(ParseError::Incomplete));
        assert_eq!(parser.parse(&[0xff]), Err(ParseError::InvalidUtf8));
    }

    #[test]
    fn test_parse_unrecognized_csi() {
        let mut parser = InputParser::new();
        assert_eq!(
            parser.parse(b"\x1b[5x"),
            Err(ParseError::UnrecognizedSequence(b"\x1b[5x".to_vec()))
        );
    }

    #[test]
    fn test_parse_all_mixed() {
        let mut parser = InputParser::new();
        let (events, consumed) = parser.parse_all(b"1+1\x1b[D\x1b[5x\r\x1b[");
        // trailing "ESC [" stays for the next read
        assert_eq!(consumed, 11);
        let codes: Vec<KeyCode> = events.iter().map(|e| e.key().unwrap().code).collect();
        assert_eq!(
            codes,
            vec![
                KeyCode::Char('1'),
                KeyCode::Char('+'),
                KeyCode::Char('1'),
                KeyCode::Left,
                KeyCode::Enter,
            ]
        );
    }

    #[test]
    fn test_decode_chunk() {
        assert_eq!(decode_chunk(b""), None);
        assert_eq!(decode_chunk(b"ab"), Some(Event::Data("ab".to_string())));
        assert_eq!(decode_chunk(b"\r"), Some(Event::Data("\r".to_string())));
    }
}
