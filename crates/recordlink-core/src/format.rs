//! Output Formatter: turns a supplemented pairs frame
//! with internal handles into a user-facing table of renamed columns, in
//! the order the plan's `output` list asked for.

use crate::callbacks::{Alert, Importance};
use crate::error::{MatchError, MatchResult};
use crate::frame::{self, Frame};
use crate::store::ColumnMap;
use indexmap::IndexMap;

/// A single parsed `output` token: `1.field`, `2.field`, `1*`/`2*` (every
/// remaining column on that side), or `degree`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OutputSpec {
    Field { side: u8, name: String },
    AllRemaining { side: u8 },
    Degree,
}

fn parse_output_token(token: &str) -> MatchResult<OutputSpec> {
    if token == "degree" {
        return Ok(OutputSpec::Degree);
    }
    if let Some(side) = token.strip_suffix('*') {
        return match side {
            "1" => Ok(OutputSpec::AllRemaining { side: 1 }),
            "2" => Ok(OutputSpec::AllRemaining { side: 2 }),
            _ => Err(MatchError::UnknownOutputSpec(token.to_string())),
        };
    }
    let mut parts = token.splitn(2, '.');
    let side = parts.next().unwrap_or_default();
    let name = parts.next();
    match (side, name) {
        ("1", Some(name)) if !name.is_empty() => Ok(OutputSpec::Field { side: 1, name: name.to_string() }),
        ("2", Some(name)) if !name.is_empty() => Ok(OutputSpec::Field { side: 2, name: name.to_string() }),
        _ => Err(MatchError::UnknownOutputSpec(token.to_string())),
    }
}

/// Concatenates every `_block*_degree` column present, in block order, with
/// `"; "`, producing the single `degree` output column.
fn concat_degrees(frame: &Frame, degree_columns: &[String]) -> Vec<Option<String>> {
    let n = frame::len(frame);
    (0..n)
        .map(|row| {
            let parts: Vec<&str> = degree_columns
                .iter()
                .filter_map(|c| frame[c][row].as_deref())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        })
        .collect()
}

/// Renders the supplemented pairs `frame` into user-facing output columns.
///
/// `output` is the plan's raw `output` list; an empty list means the default
/// of every side-1 column, then every side-2 column, in their original
/// order, without a `degree` column. `alert` receives a non-fatal warning
/// for every column name collision that had to be disambiguated with a
/// `_1`/`_2` suffix.
pub fn run(
    frame: &Frame,
    map1: &ColumnMap,
    map2: &ColumnMap,
    degree_columns: &[String],
    output: &[String],
    alert: &mut dyn Alert,
) -> MatchResult<Frame> {
    let specs: Vec<OutputSpec> = if output.is_empty() {
        map1.keys()
            .map(|name| OutputSpec::Field { side: 1, name: name.clone() })
            .chain(map2.keys().map(|name| OutputSpec::Field { side: 2, name: name.clone() }))
            .collect()
    } else {
        output.iter().map(|t| parse_output_token(t)).collect::<MatchResult<_>>()?
    };

    let mut columns: Vec<(String, String)> = Vec::new(); // (output name, internal handle)
    let mut seen_tokens = std::collections::HashSet::new();
    for spec in &specs {
        let token_key = match spec {
            OutputSpec::Field { side, name } => format!("{side}.{name}"),
            OutputSpec::AllRemaining { side } => format!("{side}*"),
            OutputSpec::Degree => "degree".to_string(),
        };
        if !seen_tokens.insert(token_key.clone()) {
            return Err(MatchError::DuplicateOutput(token_key));
        }
        match spec {
            OutputSpec::Field { side, name } => {
                let map = if *side == 1 { map1 } else { map2 };
                let handle = map.get(name).cloned().ok_or_else(|| MatchError::UnknownField {
                    side: if *side == 1 { crate::error::Side::One } else { crate::error::Side::Two },
                    field: name.clone(),
                })?;
                columns.push((name.clone(), handle));
            }
            OutputSpec::AllRemaining { side } => {
                let map = if *side == 1 { map1 } else { map2 };
                let already_used: std::collections::HashSet<&str> =
                    columns.iter().map(|(_, handle)| handle.as_str()).collect();
                for (name, handle) in map {
                    if !already_used.contains(handle.as_str()) {
                        columns.push((name.clone(), handle.clone()));
                    }
                }
            }
            OutputSpec::Degree => {
                // handled after the loop, once every field column name is known
            }
        }
    }

    let wants_degree = specs.iter().any(|s| matches!(s, OutputSpec::Degree));

    let mut final_names: IndexMap<String, String> = IndexMap::new(); // display name -> handle ("" for the synthetic degree column)
    let mut name_counts: IndexMap<String, usize> = IndexMap::new();
    for (name, _) in &columns {
        *name_counts.entry(name.clone()).or_insert(0) += 1;
    }

    let mut per_name_seen: IndexMap<String, usize> = IndexMap::new();
    let mut alerted_names = std::collections::HashSet::new();
    for (name, handle) in &columns {
        let count = *name_counts.get(name).unwrap_or(&1);
        let display = if count > 1 {
            let seen = per_name_seen.entry(name.clone()).or_insert(0);
            *seen += 1;
            let suffix = *seen;
            let disambiguated = format!("{name}_{suffix}");
            if alerted_names.insert(name.clone()) {
                alert.alert(
                    &format!("output column \"{name}\" appears on both sides; disambiguated as \"{disambiguated}\""),
                    Importance::Warning,
                );
            }
            disambiguated
        } else {
            name.clone()
        };
        final_names.insert(display, handle.clone());
    }

    let mut out = Frame::new();
    let n = frame::len(frame);
    for (display, handle) in &final_names {
        let values = frame
            .get(handle)
            .cloned()
            .unwrap_or_else(|| vec![None; n]);
        out.insert(display.clone(), values);
    }
    if wants_degree {
        out.insert("degree".to_string(), concat_degrees(frame, degree_columns));
    }
    Ok(out)
}
