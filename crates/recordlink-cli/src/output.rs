//! Renders the engine's matched-pairs `RecordBatch` in the format the CLI
//! was asked for, delegating the actual encoding to `recordlink-export`.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;

/// Renders `batch` to bytes in `format`.
pub fn render(batch: &RecordBatch, format: OutputFormat, compact: bool) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => recordlink_export::export_csv(batch).context("failed to render CSV output"),
        OutputFormat::Json => recordlink_export::export_json(batch, compact)
            .map(String::into_bytes)
            .context("failed to render JSON output"),
    }
}
