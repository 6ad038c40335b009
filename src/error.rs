//! Error types for the REPL line editor.

use std::fmt;
use std::io;
use std::time::Duration;

/// Result type alias for line editor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for line editor operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error from terminal operations.
    Io(io::Error),
    /// Edit or cursor offset outside the buffer.
    OutOfRange { offset: usize, len: usize },
    /// Attempt to record a blank command in history.
    Validation(String),
    /// The evaluation engine reported a failure.
    Evaluation(EvalError),
    /// The evaluation engine never reported ready within the configured bound.
    ReadinessTimeout { waited: Duration },
    /// Malformed profile document.
    Profile(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OutOfRange { offset, len } => {
                write!(f, "offset {offset} out of range for buffer of length {len}")
            }
            Self::Validation(msg) => write!(f, "validation failed: {msg}"),
            Self::Evaluation(e) => write!(f, "{e}"),
            Self::ReadinessTimeout { waited } => {
                write!(
                    f,
                    "evaluation engine not ready after {}ms",
                    waited.as_millis()
                )
            }
            Self::Profile(msg) => write!(f, "invalid profile document: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Evaluation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Self {
        Self::Evaluation(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Profile(e.to_string())
    }
}

/// Failure raised while evaluating a submitted command.
///
/// Displays as `Kind: message`, the way an interpreter reports an exception.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: String,
    pub message: String,
}

impl EvalError {
    #[must_use]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new("SyntaxError", message)
    }

    #[must_use]
    pub fn name(name: &str) -> Self {
        Self::new("NameError", format!("name '{name}' is not defined"))
    }

    #[must_use]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new("TypeError", message)
    }

    #[must_use]
    pub fn zero_division() -> Self {
        Self::new("ZeroDivisionError", "division by zero")
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for EvalError {}
