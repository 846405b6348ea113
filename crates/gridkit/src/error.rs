//! Error types for the gridkit crate.
//!
//! Only caller mistakes surface here. Malformed *data* never produces an
//! error; it is reported through a [`DiagnosticSink`](crate::DiagnosticSink)
//! instead.

use thiserror::Error;

/// Errors raised for invalid caller configuration or misrouted actions.
#[derive(Debug, Error)]
pub enum GridError {
    /// An action addressed a column whose filter is of the other variant.
    #[error("expected filter '{column}' to be a {expected} filter, but it is a {actual} filter")]
    FilterKindMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// An action addressed a column that has no filter entry.
    #[error("no filter is declared for column '{0}'")]
    UnknownFilterColumn(String),

    /// A toggle named a value the column's filter does not offer.
    #[error("column '{column}' offers no filter value '{value}'")]
    UnknownFilterValue { column: String, value: String },

    /// An action arrived with an unrecognized `type` tag.
    #[error("unknown action type: '{0}'")]
    UnknownAction(String),

    /// An action payload could not be decoded.
    #[error("malformed action: {0}")]
    MalformedAction(#[source] serde_json::Error),

    /// Table configuration is invalid.
    #[error("invalid table configuration: {0}")]
    Config(String),
}

/// Result type for gridkit operations.
pub type Result<T> = std::result::Result<T, GridError>;
