//! Error types for the matching engine.
//!
//! # Error handling strategy
//!
//! Every variant of [`MatchError`] is fatal: returning one from
//! [`crate::plan::run`] aborts the match before any further block runs.
//! Non-fatal conditions — a disambiguated output column, a `bilenko` block
//! that needs more labeling before it can train — are reported through the
//! [`crate::callbacks::Alert`] callback instead and never appear here.

use std::fmt;
use thiserror::Error;

/// Which input dataset an error concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    One,
    Two,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::One => write!(f, "first"),
            Side::Two => write!(f, "second"),
        }
    }
}

/// Error kinds from spec section 7, one variant per row of the table there.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("{side} dataset has duplicate headers: {name}")]
    DuplicateHeaders { side: Side, name: String },

    #[error("{field}: field not found in dataset {side}")]
    UnknownField { side: Side, field: String },

    #[error("{field}: field is not a string column")]
    NonStringField { field: String },

    #[error("block {block}: both inputs must have the same number of fields specified")]
    FieldCountMismatch { block: usize },

    #[error("threshold must be between 0.0 and 1.0 (inclusive), got {0}")]
    ThresholdOutOfRange(f64),

    #[error("{0}: method does not exist")]
    UnknownMethod(String),

    #[error("{0}: ignorance property not known")]
    UnknownIgnore(String),

    #[error("{0}: join type not known")]
    UnknownJoin(String),

    #[error(
        "output format must be the dataset number, followed by a dot, followed by the name of the column: {0}"
    )]
    UnknownOutputSpec(String),

    #[error("output cannot contain duplicates: {0}")]
    DuplicateOutput(String),

    #[error("unknown data source format")]
    UnknownSourceFormat,

    #[error("{column}: column has {actual} values, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        actual: usize,
        expected: usize,
    },

    #[error("labeling was cancelled")]
    LabelingCancelled,

    #[error("invalid regex in ignore directive: {0}")]
    InvalidRegex(String),

    #[error("failed to build the output Arrow table: {0}")]
    ExportFailed(String),
}

/// Result alias used throughout the crate.
pub type MatchResult<T> = Result<T, MatchError>;
