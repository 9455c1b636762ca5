//! JSON rendering of a matched-pairs `RecordBatch`: an array of row objects,
//! one key per output column.

use crate::{column_as_strings, ExportError};
use arrow::record_batch::RecordBatch;
use serde_json::{Map, Value};

/// Renders `batch` as a JSON array of objects. `compact` selects minified
/// output over pretty-printed, matching the host's terminal-vs-file use.
pub fn export_json(batch: &RecordBatch, compact: bool) -> Result<String, ExportError> {
    let headers: Vec<&str> = batch.schema().fields().iter().map(|f| f.name().as_str()).collect();
    let columns: Vec<Vec<Option<&str>>> = (0..batch.num_columns())
        .map(|i| column_as_strings(batch, i))
        .collect::<Result<_, _>>()?;

    let mut rows = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let mut object = Map::new();
        for (col, header) in columns.iter().zip(&headers) {
            let value = match col[row] {
                Some(s) => Value::String(s.to_string()),
                None => Value::Null,
            };
            object.insert((*header).to_string(), value);
        }
        rows.push(Value::Object(object));
    }

    let value = Value::Array(rows);
    if compact {
        serde_json::to_string(&value).map_err(|e| ExportError::Serialization(e.to_string()))
    } else {
        serde_json::to_string_pretty(&value).map_err(|e| ExportError::Serialization(e.to_string()))
    }
}
