//! Column Store: the uniform view every operator in this crate is expressed
//! against, plus ingestion from the handful of shapes this engine
//! accepts.

use crate::error::{MatchError, MatchResult, Side};
use crate::frame::{len, Frame};
use arrow::array::{Array, StringArray};
use arrow::record_batch::RecordBatch;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Bijection from user-facing column name to the internal handle
/// (`_data{side}_col{k}`) it was renamed to.
pub type ColumnMap = IndexMap<String, String>;

/// One ingested side of a match: its data under internal handles, and the
/// name of its row-id column.
#[derive(Debug, Clone)]
pub struct ColumnStore {
    pub frame: Frame,
    pub id_column: String,
}

/// The tagged variant of acceptable ingress shapes: a small tagged enum
/// with one constructor per accepted shape. No runtime type inspection
/// leaks past this boundary.
pub enum Source {
    /// A dict mapping column name to its sequence of string values.
    Columns(IndexMap<String, Vec<String>>),
    /// A row-oriented table: one map per row. Rows need not share every key;
    /// a key missing from a row becomes an empty string for that row (there
    /// is no "missing input cell" concept, only "missing supplemented
    /// cell" — see the Supplementer).
    Rows(Vec<IndexMap<String, String>>),
    /// An Arrow table; every column referenced by a fieldmap must be
    /// `Utf8`/`LargeUtf8`, checked lazily at the point it's used.
    Arrow(RecordBatch),
    /// An already-ingested column store, passed straight through.
    Table(ColumnStore),
}

impl Source {
    fn into_columns(self, side: Side) -> MatchResult<IndexMap<String, Vec<String>>> {
        match self {
            Source::Columns(columns) => Ok(columns),
            Source::Rows(rows) => Ok(rows_to_columns(rows)),
            Source::Arrow(batch) => arrow_to_columns(&batch, side),
            Source::Table(store) => {
                // Already ingested: recover user-facing columns is not
                // possible without a column map, so this variant is only
                // meaningful when used directly as a `ColumnStore` (callers
                // that already have one should skip `ingest` entirely).
                let mut columns = IndexMap::new();
                for (name, values) in store.frame {
                    columns.insert(
                        name,
                        values.into_iter().map(|v| v.unwrap_or_default()).collect(),
                    );
                }
                Ok(columns)
            }
        }
    }
}

fn rows_to_columns(rows: Vec<IndexMap<String, String>>) -> IndexMap<String, Vec<String>> {
    let mut keys: Vec<String> = Vec::new();
    for row in &rows {
        for key in row.keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    let mut columns: IndexMap<String, Vec<String>> = keys
        .iter()
        .map(|k| (k.clone(), Vec::with_capacity(rows.len())))
        .collect();
    for row in &rows {
        for key in &keys {
            columns
                .get_mut(key)
                .expect("column initialized above")
                .push(row.get(key).cloned().unwrap_or_default());
        }
    }
    columns
}

fn arrow_to_columns(batch: &RecordBatch, side: Side) -> MatchResult<IndexMap<String, Vec<String>>> {
    let schema = batch.schema();
    let mut seen = HashSet::new();
    let mut columns = IndexMap::new();
    for field in schema.fields() {
        let name = field.name().clone();
        if !seen.insert(name.clone()) {
            return Err(MatchError::DuplicateHeaders { side, name });
        }
        let array = batch
            .column_by_name(&name)
            .expect("field present in its own schema");
        let values = arrow_column_to_strings(array.as_ref(), &name)?;
        columns.insert(name, values);
    }
    Ok(columns)
}

fn arrow_column_to_strings(array: &dyn Array, name: &str) -> MatchResult<Vec<String>> {
    let strings = array
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| MatchError::NonStringField {
            field: name.to_string(),
        })?;
    Ok((0..strings.len())
        .map(|i| {
            if strings.is_null(i) {
                String::new()
            } else {
                strings.value(i).to_string()
            }
        })
        .collect())
}

/// Ingests a `Source` for one side of the match: validates no duplicate
/// headers, renames every user column to an internal handle, and appends a
/// dense row-id column.
pub fn ingest(source: Source, side: Side) -> MatchResult<(ColumnStore, ColumnMap)> {
    let prefix = match side {
        Side::One => "_data1",
        Side::Two => "_data2",
    };
    let columns = source.into_columns(side)?;

    let mut seen = HashSet::new();
    for name in columns.keys() {
        if !seen.insert(name.clone()) {
            return Err(MatchError::DuplicateHeaders {
                side,
                name: name.clone(),
            });
        }
    }

    let row_count = columns.values().map(Vec::len).next().unwrap_or(0);
    for (name, values) in &columns {
        if values.len() != row_count {
            return Err(MatchError::ColumnLengthMismatch {
                column: name.clone(),
                actual: values.len(),
                expected: row_count,
            });
        }
    }

    let mut column_map = ColumnMap::new();
    let mut frame = Frame::new();
    for (i, (name, values)) in columns.into_iter().enumerate() {
        let handle = format!("{prefix}_col{i}");
        column_map.insert(name, handle.clone());
        frame.insert(handle, values.into_iter().map(Some).collect());
    }

    let id_column = format!("{prefix}_id");
    let ids = (0..row_count).map(|i| Some(i.to_string())).collect();
    frame.insert(id_column.clone(), ids);

    Ok((ColumnStore { frame, id_column }, column_map))
}

/// Converts a result [`Frame`] with user-facing headers back into an Arrow
/// table, the egress shape a host program consumes.
pub fn frame_to_arrow(frame: &Frame, ordered_columns: &[String]) -> arrow::error::Result<RecordBatch> {
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    let fields: Vec<Field> = ordered_columns
        .iter()
        .map(|name| Field::new(name, DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let row_count = len(frame);
    let arrays: Vec<Arc<dyn Array>> = ordered_columns
        .iter()
        .map(|name| {
            let values = frame
                .get(name)
                .cloned()
                .unwrap_or_else(|| vec![None; row_count]);
            let array: StringArray = values.iter().map(|v| v.as_deref()).collect();
            Arc::new(array) as Arc<dyn Array>
        })
        .collect();

    RecordBatch::try_new(schema, arrays)
}
