//! Input routing: the REPL's line-editing state machine.
//!
//! Every event is classified into a [`LineAction`] and applied to the owned
//! [`LineBuffer`] and [`History`]. Screen updates go through
//! [`RedrawPolicy`]; submitted lines go to the [`Evaluator`].
//!
//! In [`EventMode::Data`] only text chunks arrive, so the router can insert
//! and submit but cannot edit, browse history or move the cursor.

use crate::ansi;
use crate::config::ReplConfig;
use crate::engine::Evaluator;
use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_log};
use crate::history::{History, Recall};
use crate::input::{Event, KeyCode, KeyEvent};
use crate::mode::EventMode;
use crate::render::{Prompt, RedrawPolicy, WriteInstruction};
use crate::terminal::TerminalSurface;
use crate::text::LineBuffer;
use unicode_width::UnicodeWidthChar;

/// What an input event asks the line editor to do.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LineAction {
    Submit,
    Backspace,
    HistoryUp,
    HistoryDown,
    CursorLeft,
    CursorRight,
    /// Insert text at the cursor (tab already expanded).
    Insert(String),
    Ignored,
}

impl LineAction {
    /// Classify a key event. First match wins: Enter, Backspace, Up, Down,
    /// Left, Right, then printable input.
    ///
    /// Printable input held with any of Alt, AltGr, Ctrl, Meta or Super is
    /// ignored. Tab inserts `tab_expansion`.
    #[must_use]
    pub fn classify_key(key: &KeyEvent, tab_expansion: &str) -> Self {
        match key.code {
            KeyCode::Enter => Self::Submit,
            KeyCode::Backspace => Self::Backspace,
            KeyCode::Up => Self::HistoryUp,
            KeyCode::Down => Self::HistoryDown,
            KeyCode::Left => Self::CursorLeft,
            KeyCode::Right => Self::CursorRight,
            _ if key.has_shortcut_modifier() => Self::Ignored,
            KeyCode::Tab => Self::Insert(tab_expansion.to_string()),
            KeyCode::Char(c) if !c.is_control() => Self::Insert(c.to_string()),
            _ => Self::Ignored,
        }
    }

    /// Classify a raw text chunk.
    ///
    /// A chunk that is all whitespace, other than a single space, is taken
    /// to be an Enter keystroke. Anything else is literal text.
    #[must_use]
    pub fn classify_data(chunk: &str) -> Self {
        if chunk.is_empty() {
            Self::Ignored
        } else if chunk.trim().is_empty() && chunk != " " {
            Self::Submit
        } else {
            Self::Insert(chunk.to_string())
        }
    }

    /// True for actions that change nothing.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// Owns the line state and turns events into terminal writes.
pub struct InputRouter<S: TerminalSurface, E: Evaluator> {
    surface: S,
    engine: E,
    buffer: LineBuffer,
    history: History,
    prompt: Prompt,
    policy: RedrawPolicy,
    mode: EventMode,
    tab_expansion: String,
}

impl<S: TerminalSurface, E: Evaluator> InputRouter<S, E> {
    #[must_use]
    pub fn new(surface: S, engine: E, config: &ReplConfig, mode: EventMode) -> Self {
        Self {
            surface,
            engine,
            buffer: LineBuffer::new(),
            history: History::new(),
            prompt: config.prompt(),
            policy: RedrawPolicy::new(config.coarse_cursor_query),
            mode,
            tab_expansion: config.tab_expansion.clone(),
        }
    }

    /// Start with previously submitted commands.
    #[must_use]
    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    #[must_use]
    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    #[must_use]
    pub fn mode(&self) -> EventMode {
        self.mode
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Give back the surface and engine.
    pub fn into_parts(self) -> (S, E) {
        (self.surface, self.engine)
    }

    /// Replace the current line with `text` and draw it after the prompt.
    pub fn set_line(&mut self, text: &str) -> Result<()> {
        self.buffer = self.buffer.replace(text);
        self.redraw(self.policy.render(&self.prompt, &self.buffer))?;
        self.surface.flush()?;
        Ok(())
    }

    /// Classify `event` for the current mode and apply it.
    ///
    /// Events of the other mode are ignored. Evaluation failures are written
    /// to the terminal, never returned; only terminal I/O errors propagate.
    pub fn handle(&mut self, event: &Event) -> Result<LineAction> {
        let action = match (self.mode, event) {
            (EventMode::Key, Event::Key(key)) => LineAction::classify_key(key, &self.tab_expansion),
            (EventMode::Data, Event::Data(chunk)) => LineAction::classify_data(chunk),
            (mode, other) => {
                emit_log(
                    LogLevel::Debug,
                    &format!("{mode} mode router ignoring {other:?}"),
                );
                return Ok(LineAction::Ignored);
            }
        };
        emit_log(
            LogLevel::Debug,
            &format!(
                "{action:?} on {:?} at offset {}",
                self.buffer.text(),
                self.buffer.cursor()
            ),
        );
        self.apply(&action)?;
        self.surface.flush()?;
        Ok(action)
    }

    /// Apply an already classified action.
    pub fn apply(&mut self, action: &LineAction) -> Result<()> {
        match action {
            LineAction::Submit => self.submit(),
            LineAction::Backspace => self.backspace(),
            LineAction::HistoryUp => self.history_up(),
            LineAction::HistoryDown => self.history_down(),
            LineAction::CursorLeft => self.cursor_left(),
            LineAction::CursorRight => self.cursor_right(),
            LineAction::Insert(text) => self.insert(text),
            LineAction::Ignored => Ok(()),
        }
    }

    fn submit(&mut self) -> Result<()> {
        if self.mode == EventMode::Data {
            emit_log(LogLevel::Warn, "assuming enter key");
        }
        let command = self.buffer.text().to_string();
        self.buffer = LineBuffer::new();

        match self.history.push(&command) {
            Ok(()) => {
                emit_log(LogLevel::Info, &format!("submit {command:?}"));
                let output = match self.engine.execute(&command) {
                    Ok(output) => output,
                    Err(e) => {
                        emit_log(LogLevel::Info, &format!("evaluation failed: {e}"));
                        e.to_string()
                    }
                };
                if !output.is_empty() {
                    self.surface.write(ansi::CRLF)?;
                    self.surface.write(&ansi::normalize_newlines(&output))?;
                }
            }
            Err(Error::Validation(reason)) => {
                emit_log(LogLevel::Debug, &format!("submission suppressed: {reason}"));
            }
            Err(e) => return Err(e),
        }

        self.surface.write(ansi::CRLF)?;
        self.redraw(self.policy.render_empty(&self.prompt))
    }

    fn backspace(&mut self) -> Result<()> {
        if self.mode == EventMode::Data {
            return Ok(());
        }
        if self.buffer.at_start() {
            return self.redraw(self.policy.render(&self.prompt, &self.buffer));
        }
        self.buffer = self.buffer.delete_before(self.buffer.cursor())?;
        self.redraw(self.policy.render_after_delete(&self.prompt, &self.buffer))
    }

    fn history_up(&mut self) -> Result<()> {
        if self.mode == EventMode::Data {
            return Ok(());
        }
        let Some(entry) = self.history.step_back() else {
            return Ok(());
        };
        self.buffer = self.buffer.replace(entry);
        self.redraw(self.policy.render(&self.prompt, &self.buffer))
    }

    fn history_down(&mut self) -> Result<()> {
        if self.mode == EventMode::Data {
            return Ok(());
        }
        self.buffer = match self.history.step_forward() {
            Recall::Entry(entry) => self.buffer.replace(entry),
            Recall::Live => self.buffer.replace(""),
        };
        self.redraw(self.policy.render(&self.prompt, &self.buffer))
    }

    fn cursor_left(&mut self) -> Result<()> {
        if self.mode == EventMode::Data {
            return Ok(());
        }
        let Some(c) = self.buffer.char_before_cursor() else {
            return Ok(());
        };
        self.buffer = self.buffer.move_cursor(-1);
        self.surface
            .write(&ansi::cursor_left(c.width().unwrap_or(0)))?;
        Ok(())
    }

    fn cursor_right(&mut self) -> Result<()> {
        if self.mode == EventMode::Data {
            return Ok(());
        }
        let Some(c) = self.buffer.char_at_cursor() else {
            return Ok(());
        };
        self.buffer = self.buffer.move_cursor(1);
        self.surface
            .write(&ansi::cursor_right(c.width().unwrap_or(0)))?;
        Ok(())
    }

    fn insert(&mut self, text: &str) -> Result<()> {
        match self.mode {
            EventMode::Key => {
                self.buffer = self.buffer.insert_at(self.buffer.cursor(), text)?;
                self.redraw(self.policy.render(&self.prompt, &self.buffer))
            }
            EventMode::Data => {
                // Echo only; the cursor never leaves the end in this mode.
                self.buffer = self.buffer.insert_at(self.buffer.len(), text)?;
                self.surface.write(text)?;
                Ok(())
            }
        }
    }

    fn redraw(&mut self, instruction: WriteInstruction) -> Result<()> {
        self.surface.write(&instruction.to_ansi())?;
        self.check_cursor_column();
        Ok(())
    }

    fn check_cursor_column(&self) {
        if self.policy.coarse_cursor_query {
            return;
        }
        let expected = self.prompt.cursor_column(&self.buffer);
        let actual = self.surface.cursor_x();
        if expected != actual {
            emit_log(
                LogLevel::Warn,
                &format!("cursor drift: terminal at column {actual}, expected {expected}"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::input::KeyModifiers;
    use crate::terminal::Terminal;

    #[derive(Default)]
    struct Echo {
        calls: Vec<String>,
    }

    impl Evaluator for Echo {
        fn lookup(&self, _name: &str) -> Option<String> {
            None
        }

        fn execute(&mut self, command: &str) -> std::result::Result<String, EvalError> {
            self.calls.push(command.to_string());
            match command {
                "1+1" => Ok("2".to_string()),
                "boom" => Err(EvalError::name("boom")),
                "silent" => Ok(String::new()),
                other => Ok(format!("{other}\nend")),
            }
        }
    }

    type Router = InputRouter<Terminal<Vec<u8>>, Echo>;

    fn router(mode: EventMode) -> Router {
        InputRouter::new(
            Terminal::new(Vec::new()),
            Echo::default(),
            &ReplConfig::default(),
            mode,
        )
    }

    fn output(router: &Router) -> String {
        String::from_utf8_lossy(router.surface().writer()).into_owned()
    }

    fn clear_output(router: &mut Router) {
        router.surface_mut().writer_mut().clear();
    }

    fn key(router: &mut Router, code: KeyCode) -> LineAction {
        router.handle(&Event::Key(KeyEvent::key(code))).unwrap()
    }

    fn type_str(router: &mut Router, text: &str) {
        for c in text.chars() {
            key(router, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_classify_key_priority() {
        let tab = "    ";
        assert_eq!(LineAction::classify_key(&KeyEvent::key(KeyCode::Enter), tab), LineAction::Submit);
        assert_eq!(
            LineAction::classify_key(&KeyEvent::with_ctrl(KeyCode::Left), tab),
            LineAction::CursorLeft
        );
        assert_eq!(
            LineAction::classify_key(&KeyEvent::key(KeyCode::Tab), tab),
            LineAction::Insert("    ".to_string())
        );
        assert_eq!(
            LineAction::classify_key(&KeyEvent::char('x'), tab),
            LineAction::Insert("x".to_string())
        );
        assert_eq!(
            LineAction::classify_key(&KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT), tab),
            LineAction::Insert("X".to_string())
        );
        for mods in [
            KeyModifiers::CTRL,
            KeyModifiers::ALT,
            KeyModifiers::ALT_GRAPH,
            KeyModifiers::META,
            KeyModifiers::SUPER,
        ] {
            assert!(LineAction::classify_key(&KeyEvent::new(KeyCode::Char('a'), mods), tab).is_ignored());
        }
        assert!(LineAction::classify_key(&KeyEvent::key(KeyCode::F(1)), tab).is_ignored());
        assert!(LineAction::classify_key(&KeyEvent::key(KeyCode::Delete), tab).is_ignored());
    }

    #[test]
    fn test_classify_data() {
        assert_eq!(LineAction::classify_data("\r"), LineAction::Submit);
        assert_eq!(LineAction::classify_data("\n"), LineAction::Submit);
        assert_eq!(LineAction::classify_data("  "), LineAction::Submit);
        assert_eq!(LineAction::classify_data(" "), LineAction::Insert(" ".to_string()));
        assert_eq!(LineAction::classify_data("ab"), LineAction::Insert("ab".to_string()));
        assert_eq!(LineAction::classify_data("a\r"), LineAction::Insert("a\r".to_string()));
        assert!(LineAction::classify_data("").is_ignored());
    }

    #[test]
    fn test_submit_writes_result_and_prompt() {
        let mut router = router(EventMode::Key);
        type_str(&mut router, "1+1");
        clear_output(&mut router);
        assert_eq!(key(&mut router, KeyCode::Enter), LineAction::Submit);
        assert_eq!(output(&router), "\r\n2\r\n\x1b[2K\r>>> ");
        assert_eq!(router.history().entries(), ["1+1"]);
        assert!(router.buffer().is_empty());
        assert_eq!(router.surface().cursor_x(), 4);
    }

    #[test]
    fn test_blank_submit_is_suppressed() {
        let mut router = router(EventMode::Key);
        type_str(&mut router, "   ");
        clear_output(&mut router);
        key(&mut router, KeyCode::Enter);
        assert_eq!(output(&router), "\r\n\x1b[2K\r>>> ");
        assert!(router.history().is_empty());
        assert!(router.engine().calls.is_empty());
        assert!(router.buffer().is_empty());
    }

    #[test]
    fn test_eval_error_is_rendered() {
        let mut router = router(EventMode::Key);
        type_str(&mut router, "boom");
        clear_output(&mut router);
        key(&mut router, KeyCode::Enter);
        assert_eq!(
            output(&router),
            "\r\nNameError: name 'boom' is not defined\r\n\x1b[2K\r>>> "
        );
    }

    #[test]
    fn test_multiline_and_empty_output() {
        let mut router = router(EventMode::Key);
        type_str(&mut router, "x");
        clear_output(&mut router);
        key(&mut router, KeyCode::Enter);
        assert_eq!(output(&router), "\r\nx\r\nend\r\n\x1b[2K\r>>> ");

        type_str(&mut router, "silent");
        clear_output(&mut router);
        key(&mut router, KeyCode::Enter);
        assert_eq!(output(&router), "\r\n\x1b[2K\r>>> ");
    }

    #[test]
    fn test_insert_in_middle_redraws() {
        let mut router = router(EventMode::Key);
        type_str(&mut router, "ac");
        key(&mut router, KeyCode::Left);
        clear_output(&mut router);
        key(&mut router, KeyCode::Char('b'));
        assert_eq!(output(&router), "\x1b[2K\r>>> abc\x1b[1D");
        assert_eq!(router.buffer().cursor(), 2);
        assert_eq!(router.surface().cursor_x(), 6);
    }

    #[test]
    fn test_cursor_motion_is_clamped() {
        let mut router = router(EventMode::Key);
        type_str(&mut router, "ab");
        clear_output(&mut router);
        key(&mut router, KeyCode::Right);
        assert_eq!(output(&router), "");

        key(&mut router, KeyCode::Left);
        key(&mut router, KeyCode::Left);
        assert_eq!(output(&router), "\x1b[1D\x1b[1D");
        assert_eq!(router.buffer().cursor(), 0);

        clear_output(&mut router);
        key(&mut router, KeyCode::Left);
        assert_eq!(output(&router), "");
        assert_eq!(router.surface().cursor_x(), 4);
    }

    #[test]
    fn test_backspace() {
        let mut router = router(EventMode::Key);
        type_str(&mut router, "abc");
        key(&mut router, KeyCode::Left);
        clear_output(&mut router);
        key(&mut router, KeyCode::Backspace);
        assert_eq!(router.buffer().text(), "ac");
        assert_eq!(router.buffer().cursor(), 1);
        assert_eq!(output(&router), "\x1b[2K\r>>> ac\x1b[1D");
    }

    #[test]
    fn test_backspace_at_start_redraws_unchanged() {
        let mut router = router(EventMode::Key);
        type_str(&mut router, "ab");
        key(&mut router, KeyCode::Left);
        key(&mut router, KeyCode::Left);
        clear_output(&mut router);
        key(&mut router, KeyCode::Backspace);
        assert_eq!(router.buffer().text(), "ab");
        assert_eq!(router.buffer().cursor(), 0);
        assert_eq!(output(&router), "\x1b[2K\r>>> ab\x1b[2D");
    }

    #[test]
    fn test_coarse_cursor_nudge() {
        let config = ReplConfig {
            coarse_cursor_query: true,
            ..ReplConfig::default()
        };
        let mut router = InputRouter::new(Terminal::new(Vec::new()), Echo::default(), &config, EventMode::Key);
        for c in "ab".chars() {
            router.handle(&KeyEvent::char(c).into()).unwrap();
        }
        router.surface_mut().writer_mut().clear();
        router.handle(&KeyEvent::key(KeyCode::Backspace).into()).unwrap();
        assert_eq!(
            String::from_utf8_lossy(router.surface().writer()),
            "\x1b[2K\r>>> a\x1b[C"
        );
    }

    #[test]
    fn test_history_navigation() {
        let mut router = router(EventMode::Key).with_history(History::with_entries(["a=1", "b=2"]));
        key(&mut router, KeyCode::Up);
        assert_eq!(router.buffer().text(), "b=2");
        key(&mut router, KeyCode::Up);
        assert_eq!(router.buffer().text(), "a=1");
        key(&mut router, KeyCode::Up);
        assert_eq!(router.buffer().text(), "a=1");
        key(&mut router, KeyCode::Down);
        assert_eq!(router.buffer().text(), "b=2");
        key(&mut router, KeyCode::Down);
        assert_eq!(router.buffer().text(), "");
        assert_eq!(router.history().entries(), ["a=1", "b=2"]);
    }

    #[test]
    fn test_history_up_without_entries_does_nothing() {
        let mut router = router(EventMode::Key);
        key(&mut router, KeyCode::Up);
        assert_eq!(output(&router), "");
    }

    #[test]
    fn test_history_down_without_entries_redraws_prompt() {
        let mut router = router(EventMode::Key);
        key(&mut router, KeyCode::Down);
        assert_eq!(output(&router), "\x1b[2K\r>>> ");
    }

    #[test]
    fn test_data_mode() {
        let mut router = router(EventMode::Data);
        router.handle(&Event::from("1+")).unwrap();
        router.handle(&Event::from("1")).unwrap();
        assert_eq!(output(&router), "1+1");
        assert_eq!(router.buffer().text(), "1+1");

        clear_output(&mut router);
        assert_eq!(router.handle(&Event::from("\r")).unwrap(), LineAction::Submit);
        assert_eq!(output(&router), "\r\n2\r\n\x1b[2K\r>>> ");
        assert_eq!(router.history().entries(), ["1+1"]);
    }

    #[test]
    fn test_modes_ignore_foreign_events() {
        let mut router = router(EventMode::Data);
        assert!(router.handle(&KeyEvent::char('a').into()).unwrap().is_ignored());
        assert!(router.buffer().is_empty());

        let mut router = self::router(EventMode::Key);
        assert!(router.handle(&Event::from("abc")).unwrap().is_ignored());
        assert!(router.buffer().is_empty());
        assert_eq!(output(&router), "");
    }

    #[test]
    fn test_set_line() {
        let mut router = router(EventMode::Key);
        router.set_line("print(ABOUT) # press enter").unwrap();
        assert_eq!(router.buffer().cursor(), 26);
        assert_eq!(output(&router), "\x1b[2K\r>>> print(ABOUT) # press enter");
    }

    #[test]
    fn test_wide_char_cursor_motion() {
        let mut router = router(EventMode::Key);
        type_str(&mut router, "中a");
        clear_output(&mut router);
        key(&mut router, KeyCode::Left);
        key(&mut router, KeyCode::Left);
        assert_eq!(output(&router), "\x1b[1D\x1b[2D");
        assert_eq!(router.surface().cursor_x(), 4);
    }
}
