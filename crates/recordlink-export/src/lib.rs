//! Egress for `recordlink-core`'s matched-pairs output.
//!
//! [`crate::run`] in `recordlink-core` produces an Arrow `RecordBatch` whose
//! columns and order follow the plan's `output` directive.
//! This crate renders that batch to the two external formats a CLI or batch
//! job actually writes to disk: delimited CSV and JSON (an array of row
//! objects).

mod csv_export;
mod error;
mod json_export;

pub use csv_export::export_csv;
pub use error::ExportError;
pub use json_export::export_json;

use arrow::array::{Array, StringArray};
use arrow::record_batch::RecordBatch;

/// Reads one column of `batch` as nullable strings, the only cell type the
/// matching engine ever emits.
fn column_as_strings<'a>(batch: &'a RecordBatch, index: usize) -> Result<Vec<Option<&'a str>>, ExportError> {
    let column = batch.column(index);
    let strings = column
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| ExportError::UnsupportedColumnType(batch.schema().field(index).name().clone()))?;
    Ok((0..strings.len())
        .map(|row| if strings.is_null(row) { None } else { Some(strings.value(row)) })
        .collect())
}
