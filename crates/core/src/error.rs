//! Error types for the stockdash pipeline.
//!
//! Only structural failures are errors. Per-record problems found during
//! normalization are collected as [`RowIssue`]s and never abort a run.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the stockdash pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Schema error (required column missing or ambiguous column mapping).
    #[error("Schema error: {0}")]
    Schema(String),

    /// Validation error (a value that must parse did not).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a schema error.
    pub fn schema(msg: impl Into<String>) -> Self {
        Error::Schema(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

/// Kind of per-record problem recovered during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Date value could not be parsed into a calendar date.
    InvalidDate,
    /// Price or volume value is not numeric.
    InvalidNumber,
    /// Price or volume value is numeric but negative or not finite.
    OutOfRange,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IssueKind::InvalidDate => "invalid date",
            IssueKind::InvalidNumber => "invalid number",
            IssueKind::OutOfRange => "out of range",
        };
        f.write_str(s)
    }
}

/// A recovered per-record validation problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssue {
    /// Zero-based data row index (header excluded).
    pub row: usize,
    /// Canonical column name.
    pub column: String,
    /// Offending value after trimming.
    pub value: String,
    /// What went wrong.
    pub kind: IssueKind,
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}: {} in column `{}` ({:?})",
            self.row, self.kind, self.column, self.value
        )
    }
}
