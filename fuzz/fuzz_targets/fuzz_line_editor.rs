//! Fuzz target for line editing.
//!
//! Generates structured key and data events and checks the editor
//! invariants after every one.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use term_repl::input::{Event, KeyCode, KeyEvent, KeyModifiers};
use term_repl::{EvalError, Evaluator, EventMode, History, InputRouter, ReplConfig, Terminal};

#[derive(Arbitrary, Debug)]
enum Input {
    Char { c: char, ctrl: bool, alt: bool },
    Enter,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Tab,
    Chunk(String),
}

impl Input {
    fn to_event(&self) -> Event {
        let key = |code| Event::Key(KeyEvent::key(code));
        match self {
            Self::Char { c, ctrl, alt } => {
                let mut mods = KeyModifiers::empty();
                mods.set(KeyModifiers::CTRL, *ctrl);
                mods.set(KeyModifiers::ALT, *alt);
                Event::Key(KeyEvent::new(KeyCode::Char(*c), mods))
            }
            Self::Enter => key(KeyCode::Enter),
            Self::Backspace => key(KeyCode::Backspace),
            Self::Up => key(KeyCode::Up),
            Self::Down => key(KeyCode::Down),
            Self::Left => key(KeyCode::Left),
            Self::Right => key(KeyCode::Right),
            Self::Tab => key(KeyCode::Tab),
            Self::Chunk(text) => Event::Data(text.clone()),
        }
    }
}

#[derive(Arbitrary, Debug)]
struct Session {
    data_mode: bool,
    history: Vec<String>,
    inputs: Vec<Input>,
}

#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
}

impl Evaluator for Recorder {
    fn lookup(&self, _name: &str) -> Option<String> {
        None
    }

    fn execute(&mut self, command: &str) -> Result<String, EvalError> {
        self.calls.push(command.to_string());
        Err(EvalError::new("Error", command))
    }
}

fuzz_target!(|session: Session| {
    let mode = if session.data_mode {
        EventMode::Data
    } else {
        EventMode::Key
    };
    let mut router = InputRouter::new(
        Terminal::new(Vec::new()),
        Recorder::default(),
        &ReplConfig::default(),
        mode,
    )
    .with_history(History::with_entries(session.history));
    let recorded = router.history().entries().to_vec();

    for input in session.inputs.iter().take(256) {
        router
            .handle(&input.to_event())
            .expect("in-memory writes cannot fail");
        assert!(router.buffer().cursor() <= router.buffer().len());
        assert!(router.history().browse_cursor() <= router.history().len());
    }

    // Recorded entries are never rewritten and blank commands never run
    assert!(router.history().entries().starts_with(&recorded));
    assert!(router.engine().calls.iter().all(|c| !c.trim().is_empty()));
});
