//! Similarity Methods: the five selectable matching
//! kernels a block chooses between, plus the shared connector-column helpers
//! they build on.

pub mod bilenko;
pub mod jaro;
pub mod levenshtein;
pub mod literal;
pub mod metaphone;

use crate::error::{MatchError, MatchResult};
use crate::frame::Frame;

/// The five external method names a block's `method` field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Literal,
    Levenshtein,
    Jaro,
    Metaphone,
    Bilenko,
}

impl Method {
    /// Parses an external method name, rejecting anything else with
    /// [`MatchError::UnknownMethod`].
    pub fn parse(name: &str) -> MatchResult<Self> {
        match name {
            "literal" => Ok(Method::Literal),
            "damerau-levenshtein" => Ok(Method::Levenshtein),
            "jaro-winkler" => Ok(Method::Jaro),
            "double-metaphone" => Ok(Method::Metaphone),
            "bilenko" => Ok(Method::Bilenko),
            other => Err(MatchError::UnknownMethod(other.to_string())),
        }
    }

    /// Whether a block's `threshold` field applies to this method. `literal`
    /// and `double-metaphone` are pass/fail; the rest score in `[0, 1]`.
    pub fn uses_threshold(self) -> bool {
        matches!(self, Method::Levenshtein | Method::Jaro | Method::Bilenko)
    }

    /// The label a [`crate::callbacks::Progress`] stage is reported under.
    pub fn label(self) -> &'static str {
        match self {
            Method::Literal => "literal matching",
            Method::Levenshtein => "damerau-levenshtein matching",
            Method::Jaro => "jaro-winkler matching",
            Method::Metaphone => "double-metaphone matching",
            Method::Bilenko => "bilenko matching",
        }
    }
}

/// Builds, per row, the `|`-joined concatenation of the named fields. Used by
/// every scored method (`levenshtein`, `jaro`, `bilenko`) to reduce a
/// multi-field comparison to a single string pair. `metaphone` joins its
/// own per-field phonetic codes with the same separator instead of calling
/// this directly, since it must encode each field before joining, not after.
pub(crate) fn build_connector(frame: &Frame, fields: &[String]) -> Vec<Option<String>> {
    let n = crate::frame::len(frame);
    (0..n)
        .map(|row| {
            let parts: Vec<String> = fields
                .iter()
                .map(|f| frame[f][row].clone().unwrap_or_default())
                .collect();
            Some(parts.join("|"))
        })
        .collect()
}

/// Shared shape behind `damerau-levenshtein` and `jaro-winkler`: reduce each
/// side to a connector string, score every cross-joined pair, keep the ones
/// at or above `threshold`, and write the formatted score into `degree_col`.
pub(crate) fn scored_match(
    data1: &Frame,
    data2: &Frame,
    fields1: &[String],
    fields2: &[String],
    threshold: f64,
    degree_col: &str,
    progress: &mut dyn Progress,
    label: &str,
    score: impl Fn(&str, &str) -> f64,
) -> Frame {
    progress.begin(label, 4);
    let mut left = data1.clone();
    left.insert("_connector1".to_string(), build_connector(data1, fields1));
    let mut right = data2.clone();
    right.insert("_connector2".to_string(), build_connector(data2, fields2));
    progress.tick();

    let pairs = crate::frame::cross_join(&left, &right);
    progress.tick();

    let n = crate::frame::len(&pairs);
    let scores: Vec<f64> = (0..n)
        .map(|row| {
            let a = pairs["_connector1"][row].as_deref().unwrap_or("");
            let b = pairs["_connector2"][row].as_deref().unwrap_or("");
            score(a, b)
        })
        .collect();
    progress.tick();

    let kept: Vec<usize> = (0..n).filter(|&r| scores[r] >= threshold).collect();
    let mut result = crate::frame::select_rows(&pairs, &kept);
    result.remove("_connector1");
    result.remove("_connector2");
    let formatted: Vec<Option<String>> = kept
        .iter()
        .map(|&r| Some(crate::degree::format_degree(scores[r])))
        .collect();
    result.insert(degree_col.to_string(), formatted);
    progress.tick();
    result
}
