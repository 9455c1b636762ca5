//! A minimal nullable-string relational frame.
//!
//! Every intermediate table the matching engine produces — the ingested
//! column stores, per-block pair tables, the chained and supplemented
//! results — is the same shape: named columns of equal length, cells
//! optionally null. [`Frame`] is that shape plus the handful of relational
//! operators the engine needs (equi-join, diagonal concatenation,
//! dedup-by-key, row selection). It deliberately does not try to be a
//! general-purpose dataframe; it only implements what the matching pipeline
//! needs.

use indexmap::IndexMap;
use std::collections::HashMap;

/// A table: ordered column name -> column values, all columns the same length.
pub type Frame = IndexMap<String, Vec<Option<String>>>;

/// Number of rows in `frame`, or 0 for a frame with no columns.
pub fn len(frame: &Frame) -> usize {
    frame.values().next().map_or(0, Vec::len)
}

/// An empty frame with the given column names and no rows.
pub fn empty_with_columns<I, S>(names: I) -> Frame
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(|n| (n.into(), Vec::new())).collect()
}

/// Returns a new frame containing only the given row indices, in order.
pub fn select_rows(frame: &Frame, rows: &[usize]) -> Frame {
    frame
        .iter()
        .map(|(name, values)| {
            let selected = rows.iter().map(|&r| values[r].clone()).collect();
            (name.clone(), selected)
        })
        .collect()
}

/// Appends a row built from `left` row `lrow` and `right` row `rrow` to `out`.
pub(crate) fn push_joined_row(out: &mut Frame, left: &Frame, lrow: usize, right: &Frame, rrow: usize) {
    for (name, values) in left {
        out.entry(name.clone())
            .or_insert_with(Vec::new)
            .push(values[lrow].clone());
    }
    for (name, values) in right {
        out.entry(name.clone())
            .or_insert_with(Vec::new)
            .push(values[rrow].clone());
    }
}

/// Builds a hash index from a composite key (the values of `keys` at each
/// row) to the list of row indices sharing that key. Rows with a null key
/// component never match anything, mirroring SQL equi-join null semantics.
fn build_index(frame: &Frame, keys: &[String]) -> HashMap<Vec<String>, Vec<usize>> {
    let mut index: HashMap<Vec<String>, Vec<usize>> = HashMap::new();
    for row in 0..len(frame) {
        let mut key = Vec::with_capacity(keys.len());
        let mut all_present = true;
        for k in keys {
            match frame[k][row].as_ref() {
                Some(v) => key.push(v.clone()),
                None => {
                    all_present = false;
                    break;
                }
            }
        }
        if all_present {
            index.entry(key).or_default().push(row);
        }
    }
    index
}

/// Inner equi-join of `left` and `right` on the composite keys `left_keys` /
/// `right_keys` (same arity, compared positionally). The result carries every
/// column from both sides; column names must be disjoint between the two
/// frames (internal handles are always unique per side, so this holds for
/// every call site in this crate).
pub fn inner_join_on(left: &Frame, left_keys: &[String], right: &Frame, right_keys: &[String]) -> Frame {
    debug_assert_eq!(left_keys.len(), right_keys.len());
    let right_index = build_index(right, right_keys);
    let mut out = empty_with_columns(left.keys().chain(right.keys()).cloned());
    for lrow in 0..len(left) {
        let mut key = Vec::with_capacity(left_keys.len());
        let mut all_present = true;
        for k in left_keys {
            match left[k][lrow].as_ref() {
                Some(v) => key.push(v.clone()),
                None => {
                    all_present = false;
                    break;
                }
            }
        }
        if !all_present {
            continue;
        }
        if let Some(matches) = right_index.get(&key) {
            for &rrow in matches {
                push_joined_row(&mut out, left, lrow, right, rrow);
            }
        }
    }
    out
}

/// Inner equi-join like [`inner_join_on`], but carries only `right`'s
/// columns that are not among `right_keys`. Use this instead of
/// [`inner_join_on`] when `left` and `right` share key-column names (e.g.
/// pruning a block's pairs down to a parent block's surviving pairs by the
/// same pair of row-id columns) — [`inner_join_on`] assumes disjoint column
/// names and would silently push two values per row into one column.
pub fn inner_join_carry(left: &Frame, left_keys: &[String], right: &Frame, right_keys: &[String]) -> Frame {
    debug_assert_eq!(left_keys.len(), right_keys.len());
    let right_index = build_index(right, right_keys);
    let carried: Vec<String> = right
        .keys()
        .filter(|k| !right_keys.contains(k))
        .cloned()
        .collect();
    let mut out = empty_with_columns(left.keys().cloned().chain(carried.iter().cloned()));
    for lrow in 0..len(left) {
        let mut key = Vec::with_capacity(left_keys.len());
        let mut all_present = true;
        for k in left_keys {
            match left[k][lrow].as_ref() {
                Some(v) => key.push(v.clone()),
                None => {
                    all_present = false;
                    break;
                }
            }
        }
        if !all_present {
            continue;
        }
        if let Some(matches) = right_index.get(&key) {
            for &rrow in matches {
                for (name, values) in left {
                    out.entry(name.clone()).or_insert_with(Vec::new).push(values[lrow].clone());
                }
                for name in &carried {
                    out.entry(name.clone()).or_insert_with(Vec::new).push(right[name][rrow].clone());
                }
            }
        }
    }
    out
}

/// Single-column convenience wrapper over [`inner_join_on`].
pub fn inner_join(left: &Frame, left_key: &str, right: &Frame, right_key: &str) -> Frame {
    inner_join_on(
        left,
        std::slice::from_ref(&left_key.to_string()),
        right,
        std::slice::from_ref(&right_key.to_string()),
    )
}

/// Unconditional cartesian product of `left` and `right`, every row of
/// `left` paired with every row of `right`. Used by the scored similarity
/// methods, which have no equi-join key to restrict the candidate set by.
pub fn cross_join(left: &Frame, right: &Frame) -> Frame {
    let mut out = empty_with_columns(left.keys().chain(right.keys()).cloned());
    for lrow in 0..len(left) {
        for rrow in 0..len(right) {
            push_joined_row(&mut out, left, lrow, right, rrow);
        }
    }
    out
}

/// Concatenates frames whose column sets may differ (diagonal concat): the
/// result has the union of all columns, missing cells filled with null.
pub fn concat_diagonal(frames: &[Frame]) -> Frame {
    let mut columns: Vec<String> = Vec::new();
    for frame in frames {
        for name in frame.keys() {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
    }
    let mut out = empty_with_columns(columns.iter().cloned());
    for frame in frames {
        let rows = len(frame);
        for name in &columns {
            let target = out.get_mut(name).expect("column initialized above");
            match frame.get(name) {
                Some(values) => target.extend(values.iter().cloned()),
                None => target.extend(std::iter::repeat(None).take(rows)),
            }
        }
    }
    out
}

/// Keeps only the first row seen for each distinct value of the composite
/// key `keys`, preserving row order otherwise.
pub fn dedup_by(frame: &Frame, keys: &[String]) -> Frame {
    let mut seen: std::collections::HashSet<Vec<Option<String>>> = std::collections::HashSet::new();
    let mut rows = Vec::new();
    for row in 0..len(frame) {
        let key: Vec<Option<String>> = keys.iter().map(|k| frame[k][row].clone()).collect();
        if seen.insert(key) {
            rows.push(row);
        }
    }
    select_rows(frame, &rows)
}

/// Filters rows for which `predicate` (given the row index) returns true.
pub fn filter_rows(frame: &Frame, predicate: impl Fn(usize) -> bool) -> Frame {
    let rows: Vec<usize> = (0..len(frame)).filter(|&r| predicate(r)).collect();
    select_rows(frame, &rows)
}

/// Sets every cell of column `name` to `value`, adding the column (all-null
/// by default, then overwritten) if it doesn't already exist.
pub fn with_literal_column(frame: &mut Frame, name: &str, value: Option<&str>) {
    let n = len(frame);
    let column = frame.entry(name.to_string()).or_insert_with(Vec::new);
    if column.is_empty() && n > 0 {
        column.resize(n, None);
    }
    for cell in column.iter_mut() {
        *cell = value.map(str::to_string);
    }
}

/// Appends `other`'s rows onto `base` in place; both frames must share the
/// same column set (use [`concat_diagonal`] when they don't).
pub fn append(base: &mut Frame, other: &Frame) {
    for (name, values) in other {
        base.entry(name.clone())
            .or_insert_with(Vec::new)
            .extend(values.iter().cloned());
    }
}
