//! Data-quality diagnostics.
//!
//! Malformed data never fails the pipeline. A record missing a declared
//! column, or a value that cannot be read as a number or a date, is reported
//! to a [`DiagnosticSink`] and processing continues.
//!
//! The default sink, [`TracingSink`], emits `tracing` warnings under the
//! `gridkit` target. Tests pass a [`CollectingSink`] to assert on exactly
//! what was reported.

use std::fmt;
use std::sync::Mutex;

use crate::value::RowId;

/// A non-fatal data anomaly observed while processing a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A declared column is missing (or blank) on a record.
    MissingColumn {
        column: String,
        record: RowId,
        available: Vec<String>,
    },
    /// A value could not be read as a number for range filtering.
    InvalidNumber { column: String, value: String },
    /// A value could not be read as a date for sorting.
    InvalidDate { column: String, value: String },
}

impl Diagnostic {
    /// Returns the column the diagnostic concerns.
    pub fn column(&self) -> &str {
        match self {
            Diagnostic::MissingColumn { column, .. }
            | Diagnostic::InvalidNumber { column, .. }
            | Diagnostic::InvalidDate { column, .. } => column,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingColumn {
                column,
                record,
                available,
            } => write!(
                f,
                "could not find column {} on record {}. Available columns: {}",
                column,
                record,
                available.join(", ")
            ),
            Diagnostic::InvalidNumber { column, value } => {
                write!(f, "invalid number in column {}: '{}'", column, value)
            }
            Diagnostic::InvalidDate { column, value } => {
                write!(f, "invalid date in column {}: '{}'", column, value)
            }
        }
    }
}

/// Receives data-quality diagnostics.
///
/// Any `Fn(Diagnostic)` closure is a sink.
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn report(&self, diagnostic: Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(Diagnostic),
{
    fn report(&self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// Emits every diagnostic as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::MissingColumn { column, record, .. } => {
                tracing::warn!(target: "gridkit", %column, %record, "{}", diagnostic)
            }
            Diagnostic::InvalidNumber { column, value }
            | Diagnostic::InvalidDate { column, value } => {
                tracing::warn!(target: "gridkit", %column, %value, "{}", diagnostic)
            }
        }
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl DiagnosticSink for SilentSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        CollectingSink::default()
    }

    /// Returns a copy of everything reported so far.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Drains and returns everything reported so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of diagnostics reported so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }
}
