//! Fuzz target for the terminal input parser.
//!
//! Arbitrary bytes must never panic the parser, and whatever events come out
//! must be safe to feed to a line editor.

#![no_main]

use libfuzzer_sys::fuzz_target;
use term_repl::input::{InputParser, ParseError};
use term_repl::{EvalError, Evaluator, EventMode, InputRouter, ReplConfig, Terminal};

struct Echo;

impl Evaluator for Echo {
    fn lookup(&self, _name: &str) -> Option<String> {
        None
    }

    fn execute(&mut self, command: &str) -> Result<String, EvalError> {
        Ok(command.to_string())
    }
}

fuzz_target!(|data: &[u8]| {
    let mut parser = InputParser::new();
    let mut router = InputRouter::new(
        Terminal::new(Vec::new()),
        Echo,
        &ReplConfig::default(),
        EventMode::Key,
    );

    let mut remaining = data;
    let mut iterations = 0;
    const MAX_ITERATIONS: usize = 10000;

    while !remaining.is_empty() && iterations < MAX_ITERATIONS {
        iterations += 1;

        match parser.parse(remaining) {
            Ok((event, consumed)) => {
                router.handle(&event).expect("in-memory writes cannot fail");
                // Avoid an infinite loop if the parser claims 0 bytes
                remaining = &remaining[consumed.max(1)..];
            }
            Err(ParseError::Empty | ParseError::Incomplete) => break,
            Err(ParseError::UnrecognizedSequence(_) | ParseError::InvalidUtf8) => {
                remaining = &remaining[1..];
            }
        }
        assert!(router.buffer().cursor() <= router.buffer().len());
    }

    assert!(
        iterations < MAX_ITERATIONS,
        "Parser appears to be in an infinite loop"
    );

    // Batch parsing must agree that it never reads past the input
    let (_, consumed) = InputParser::new().parse_all(data);
    assert!(consumed <= data.len());
});
