//! Reads a table file into a [`recordlink_core::Source`].
//!
//! Two on-disk shapes are recognized by extension: `.csv` (headers in the
//! first row) and `.json`, which may be either a dict of column name to
//! array of values, or an array of row objects — the two in-memory shapes
//! `recordlink_core::Source` accepts as "dict mapping column name to a
//! sequence of strings" and "row-oriented DataFrame".

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use recordlink_core::Source;
use std::path::Path;

/// Reads `path` into a [`Source`], dispatching on its extension.
pub fn read_table(path: &Path) -> Result<Source> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => read_csv(path),
        Some("json") => read_json(path),
        other => bail!(
            "{}: unsupported table file extension {:?} (expected .csv or .json)",
            path.display(),
            other
        ),
    }
}

fn read_csv(path: &Path) -> Result<Source> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers = reader.headers().with_context(|| format!("failed to read header row of {}", path.display()))?.clone();
    let mut columns: IndexMap<String, Vec<String>> =
        headers.iter().map(|h| (h.to_string(), Vec::new())).collect();

    for record in reader.records() {
        let record = record.with_context(|| format!("failed to read a row of {}", path.display()))?;
        for (header, value) in headers.iter().zip(record.iter()) {
            columns
                .get_mut(header)
                .expect("column initialized from the same header row")
                .push(value.to_string());
        }
    }

    Ok(Source::Columns(columns))
}

fn read_json(path: &Path) -> Result<Source> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("{}: invalid JSON", path.display()))?;

    match value {
        serde_json::Value::Object(map) => {
            let mut columns = IndexMap::new();
            for (name, values) in map {
                let values = values
                    .as_array()
                    .with_context(|| format!("{}: column {name:?} is not an array", path.display()))?
                    .iter()
                    .map(json_value_to_string)
                    .collect();
                columns.insert(name, values);
            }
            Ok(Source::Columns(columns))
        }
        serde_json::Value::Array(rows) => {
            let rows = rows
                .into_iter()
                .map(|row| {
                    let object = row
                        .as_object()
                        .with_context(|| format!("{}: every row must be a JSON object", path.display()))?;
                    Ok(object
                        .iter()
                        .map(|(k, v)| (k.clone(), json_value_to_string(v)))
                        .collect::<IndexMap<String, String>>())
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Source::Rows(rows))
        }
        _ => bail!("{}: top-level JSON value must be an object or an array", path.display()),
    }
}

fn json_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
