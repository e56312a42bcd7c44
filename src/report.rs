//! Diagnostic sinks.
//!
//! The pipeline never prints or exits on its own: scanner, parser and
//! resolver hand static diagnostics to a [`Reporter`], the interpreter hands
//! it the one runtime error that aborted a run.  The host decides what to do
//! with them and when to clear the flags (a REPL resets after every input).

use log::debug;

use crate::error::{LoxError, RuntimeError};

pub trait Reporter {
    /// A static (scan / parse / resolve) diagnostic.  `location` is the
    /// already formatted `where` fragment, e.g. `" at 'foo'"`.
    fn error(&mut self, line: usize, location: &str, message: &str);

    /// The runtime error that aborted the current run.
    fn runtime_error(&mut self, error: &RuntimeError);

    fn had_error(&self) -> bool;

    fn had_runtime_error(&self) -> bool;

    /// Clear both flags.
    fn reset(&mut self);

    /// Route a [`LoxError`] to the matching sink.
    fn report(&mut self, error: &LoxError) {
        debug!("Reporting: {}", error);

        match error {
            LoxError::Lex { message, line } => self.error(*line, "", message),
            LoxError::Parse {
                message,
                line,
                location,
            }
            | LoxError::Resolve {
                message,
                line,
                location,
            } => self.error(*line, location, message),
            LoxError::Runtime(e) => self.runtime_error(e),
            other => self.error(0, "", &other.to_string()),
        }
    }
}

fn render_static(line: usize, location: &str, message: &str) -> String {
    format!("[line {}] Error{}: {}", line, location, message)
}

/// Writes every diagnostic to stderr as soon as it is reported.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    had_error: bool,
    had_runtime_error: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for ConsoleReporter {
    fn error(&mut self, line: usize, location: &str, message: &str) {
        eprintln!("{}", render_static(line, location, message));
        self.had_error = true;
    }

    fn runtime_error(&mut self, error: &RuntimeError) {
        eprintln!("{}", error);
        self.had_runtime_error = true;
    }

    fn had_error(&self) -> bool {
        self.had_error
    }

    fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }
}

/// Keeps rendered diagnostics in report order.  Used by embedders and the
/// test-suite.
#[derive(Debug, Default)]
pub struct Diagnostics {
    messages: Vec<String>,
    had_error: bool,
    had_runtime_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Hand the recorded messages over, leaving the flags untouched.
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}

impl Reporter for Diagnostics {
    fn error(&mut self, line: usize, location: &str, message: &str) {
        self.messages.push(render_static(line, location, message));
        self.had_error = true;
    }

    fn runtime_error(&mut self, error: &RuntimeError) {
        self.messages.push(error.to_string());
        self.had_runtime_error = true;
    }

    fn had_error(&self) -> bool {
        self.had_error
    }

    fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }
}
