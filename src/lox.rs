//! The `run` entry point: scan → parse → resolve → interpret.
//!
//! A [`Lox`] session keeps its interpreter between runs, so globals and
//! closures defined by one input are still there for the next.  Each stage
//! only starts if the previous ones reported nothing.

use log::{debug, info};

use crate::interpreter::{Interpreter, Output};
use crate::parser::Parser;
use crate::report::Reporter;
use crate::resolver::Resolver;
use crate::scanner::Scanner;

pub struct Lox<R: Reporter> {
    interpreter: Interpreter,
    reporter: R,
}

impl<R: Reporter> Lox<R> {
    /// Session printing to stdout.
    pub fn new(reporter: R) -> Self {
        Self {
            interpreter: Interpreter::default(),
            reporter,
        }
    }

    /// Session printing to `output`.
    pub fn with_output(reporter: R, output: Output) -> Self {
        Self {
            interpreter: Interpreter::new(output),
            reporter,
        }
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    /// Clear the error flags, e.g. between REPL inputs.
    pub fn reset_errors(&mut self) {
        self.reporter.reset();
    }

    pub fn run(&mut self, source: &str) {
        info!("Running {} bytes of source", source.len());

        let tokens = Scanner::new(source).scan_tokens(&mut self.reporter);
        if self.reporter.had_error() {
            debug!("Stopping after scan errors");
            return;
        }

        let statements = Parser::new(tokens).parse(&mut self.reporter);
        if self.reporter.had_error() {
            debug!("Stopping after parse errors");
            return;
        }

        Resolver::new(&mut self.interpreter, &mut self.reporter).resolve(&statements);
        if self.reporter.had_error() {
            debug!("Stopping after resolve errors");
            return;
        }

        self.interpreter.interpret(&statements, &mut self.reporter);
    }
}
