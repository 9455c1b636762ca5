//! Delimited CSV rendering of a matched-pairs `RecordBatch`.

use crate::{column_as_strings, ExportError};
use arrow::record_batch::RecordBatch;
use csv::WriterBuilder;

/// Writes `batch` as CSV: a header row of the output column names, then one
/// row per pair. Null cells (e.g. an outer-join side with no match) render
/// as an empty field.
pub fn export_csv(batch: &RecordBatch) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());

    let headers: Vec<&str> = batch.schema().fields().iter().map(|f| f.name().as_str()).collect();
    writer.write_record(&headers).map_err(|e| ExportError::Csv(e.to_string()))?;

    let columns: Vec<Vec<Option<&str>>> = (0..batch.num_columns())
        .map(|i| column_as_strings(batch, i))
        .collect::<Result<_, _>>()?;

    for row in 0..batch.num_rows() {
        let record: Vec<&str> = columns.iter().map(|col| col[row].unwrap_or("")).collect();
        writer.write_record(&record).map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    writer.into_inner().map_err(|e| ExportError::Csv(e.to_string()))
}
