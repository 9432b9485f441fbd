//! Progress reporting.
//!
//! The engine never writes to the terminal itself. Everything the operator sees
//! goes through a [`Reporter`], so the CLI can style it and tests can record it.

use crate::diff::TableDiff;

/// Sink for progress and plan presentation.
pub trait Reporter {
    /// Begin a long-running step.
    fn start(&mut self, message: &str);

    /// End the current step.
    fn stop(&mut self);

    /// Informational message.
    fn info(&mut self, message: &str);

    /// Warning message.
    fn warn(&mut self, message: &str);

    /// Present one table's planned changes.
    fn table_change(&mut self, table: &TableDiff);
}

/// A reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn start(&mut self, _message: &str) {}
    fn stop(&mut self) {}
    fn info(&mut self, _message: &str) {}
    fn warn(&mut self, _message: &str) {}
    fn table_change(&mut self, _table: &TableDiff) {}
}
