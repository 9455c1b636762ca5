//! Error types for the export crate.

use thiserror::Error;

/// Errors that can occur while rendering a matched-pairs `RecordBatch` to an
/// external format.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export error: {0}")]
    Csv(String),

    #[error("JSON serialization error: {0}")]
    Serialization(String),

    #[error("unsupported Arrow column type in column {0:?}")]
    UnsupportedColumnType(String),
}
