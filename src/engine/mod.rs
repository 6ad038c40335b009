//! Evaluation engine contract.
//!
//! The router hands every submitted line to an [`Evaluator`] and prints
//! whatever comes back. Engines may need time to start (loading data,
//! booting an interpreter); [`wait_until_ready`] blocks the start of the
//! session until they report ready.
//!
//! [`ProfileEngine`] is the engine the `portfolio_repl` binary ships with.

mod interp;
mod profile;
mod profile_engine;

pub use interp::{Interpreter, Value};
pub use profile::{Profile, ProfileField};
pub use profile_engine::{ProfileEngine, ProfileSource};

use crate::error::{Error, EvalError, Result};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Lookup key for the interpreter version banner.
pub const VERSION_STRING: &str = "version_string";

/// Lookup key for the site description banner.
pub const SITE_DESCRIPTION_STRING: &str = "site_description_string";

/// Something that can run one command line and describe the outcome as text.
pub trait Evaluator {
    /// Readiness probe.
    fn is_ready(&self) -> bool {
        true
    }

    /// Signal the engine raises when it becomes ready, if it has one.
    ///
    /// Engines that provide one let [`wait_until_ready`] block instead of
    /// polling.
    fn ready_signal(&self) -> Option<&ReadySignal> {
        None
    }

    /// Read a named value from the engine's global scope.
    fn lookup(&self, name: &str) -> Option<String>;

    /// Evaluate one command line.
    ///
    /// `Ok` holds everything the command printed. `Err` is rendered to the
    /// user exactly like output.
    fn execute(&mut self, command: &str) -> std::result::Result<String, EvalError>;
}

impl<E: Evaluator + ?Sized> Evaluator for &mut E {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn ready_signal(&self) -> Option<&ReadySignal> {
        (**self).ready_signal()
    }

    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }

    fn execute(&mut self, command: &str) -> std::result::Result<String, EvalError> {
        (**self).execute(command)
    }
}

/// One-shot readiness flag that waiters can block on.
#[derive(Debug, Default)]
pub struct ReadySignal {
    ready: Mutex<bool>,
    cond: Condvar,
}

impl ReadySignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark ready and wake all waiters.
    pub fn notify(&self) {
        if let Ok(mut ready) = self.ready.lock() {
            *ready = true;
            self.cond.notify_all();
        }
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.ready.lock().is_ok_and(|ready| *ready)
    }

    /// Block until ready or until `timeout` passes. Returns whether ready.
    pub fn wait(&self, timeout: Option<Duration>) -> bool {
        let Ok(guard) = self.ready.lock() else {
            return false;
        };
        match timeout {
            None => self
                .cond
                .wait_while(guard, |ready| !*ready)
                .is_ok_and(|ready| *ready),
            Some(limit) => self
                .cond
                .wait_timeout_while(guard, limit, |ready| !*ready)
                .is_ok_and(|(ready, _)| *ready),
        }
    }
}

/// Block until `engine` is ready.
///
/// Uses the engine's [`ReadySignal`] when it has one and otherwise probes
/// [`Evaluator::is_ready`] every `poll_interval`. With `timeout == None`
/// this waits indefinitely. Returns how long the wait took.
///
/// # Errors
///
/// Returns [`Error::ReadinessTimeout`] if `timeout` elapses first.
pub fn wait_until_ready<E: Evaluator + ?Sized>(
    engine: &E,
    poll_interval: Duration,
    timeout: Option<Duration>,
) -> Result<Duration> {
    let start = Instant::now();

    if let Some(signal) = engine.ready_signal() {
        if signal.wait(timeout) || engine.is_ready() {
            return Ok(start.elapsed());
        }
        return Err(Error::ReadinessTimeout {
            waited: start.elapsed(),
        });
    }

    loop {
        if engine.is_ready() {
            return Ok(start.elapsed());
        }
        let waited = start.elapsed();
        if timeout.is_some_and(|limit| waited >= limit) {
            return Err(Error::ReadinessTimeout { waited });
        }
        std::thread::sleep(poll_interval);
    }
}
