//! Canonical formatting for a block's degree-of-match column.
//!
//! `literal` and `double-metaphone` always write `"1.0"` (they either match
//! or don't). `damerau-levenshtein`, `jaro-winkler` and `bilenko` write a
//! score in `[0, 1]`, rounded to seven decimal places and stripped of
//! insignificant trailing zeros, e.g. `0.8947368`.

/// Formats a similarity score as the text an output degree column carries.
pub fn format_degree(value: f64) -> String {
    let rounded = format!("{value:.7}");
    let trimmed = rounded.trim_end_matches('0');
    match trimmed.strip_suffix('.') {
        Some(whole) => format!("{whole}.0"),
        None => trimmed.to_string(),
    }
}
