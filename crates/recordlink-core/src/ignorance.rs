//! Ignorance Pipeline.
//!
//! Applies an ordered stack of text-normalization transforms to a working
//! copy of a column, producing a derived `_ignorant` column used only for
//! comparison. The transform order is fixed regardless of the order the
//! user listed directives in — see [`canonical_order`].

use crate::error::{MatchError, MatchResult};
use crate::frame::Frame;
use regex::Regex;

const TITLES: &str = include_str!("../resources/ignored-titles.txt");

/// A single normalization directive, already validated and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreDirective {
    Case,
    Regex(String),
    NonLatin,
    Titles,
    WordsLeading,
    WordsTailing,
    WordsOrder,
    NonAlpha,
}

impl IgnoreDirective {
    /// Fixed position in the canonical application order (lower runs first).
    fn order(&self) -> u8 {
        match self {
            IgnoreDirective::Case => 0,
            IgnoreDirective::Regex(_) => 1,
            IgnoreDirective::NonLatin => 2,
            IgnoreDirective::Titles => 3,
            IgnoreDirective::WordsLeading => 4,
            IgnoreDirective::WordsTailing => 5,
            IgnoreDirective::WordsOrder => 6,
            IgnoreDirective::NonAlpha => 7,
        }
    }
}

/// Parses a user-supplied ignore list into directives, in canonical order,
/// regardless of the order they were written in. Validates directive names
/// and honors only the first `regex=...` directive.
pub fn parse_ignores(raw: &[String]) -> MatchResult<Vec<IgnoreDirective>> {
    let mut has_case = false;
    let mut has_nonlatin = false;
    let mut has_titles = false;
    let mut has_words_leading = false;
    let mut has_words_tailing = false;
    let mut has_words_order = false;
    let mut has_nonalpha = false;
    let mut regex_pattern: Option<String> = None;

    for item in raw {
        if let Some(pattern) = item.strip_prefix("regex=") {
            if regex_pattern.is_none() {
                regex_pattern = Some(pattern.to_string());
            }
            continue;
        }
        match item.as_str() {
            "case" => has_case = true,
            "nonlatin" => has_nonlatin = true,
            "titles" => has_titles = true,
            "words-leading" => has_words_leading = true,
            "words-tailing" => has_words_tailing = true,
            "words-order" => has_words_order = true,
            "nonalpha" => has_nonalpha = true,
            other => return Err(MatchError::UnknownIgnore(other.to_string())),
        }
    }

    let mut directives = Vec::new();
    if has_case {
        directives.push(IgnoreDirective::Case);
    }
    if let Some(pattern) = regex_pattern {
        directives.push(IgnoreDirective::Regex(pattern));
    }
    if has_nonlatin {
        directives.push(IgnoreDirective::NonLatin);
    }
    if has_titles {
        directives.push(IgnoreDirective::Titles);
    }
    if has_words_leading {
        directives.push(IgnoreDirective::WordsLeading);
    }
    if has_words_tailing {
        directives.push(IgnoreDirective::WordsTailing);
    }
    if has_words_order {
        directives.push(IgnoreDirective::WordsOrder);
    }
    if has_nonalpha {
        directives.push(IgnoreDirective::NonAlpha);
    }
    directives.sort_by_key(IgnoreDirective::order);
    Ok(directives)
}

/// Writes `_ignorant` from `source_col`, then applies every directive to it
/// in place, in canonical order.
pub fn apply_ignorance(
    frame: &mut Frame,
    source_col: &str,
    target_col: &str,
    directives: &[IgnoreDirective],
) -> MatchResult<()> {
    let initial = frame
        .get(source_col)
        .cloned()
        .unwrap_or_default();
    frame.insert(target_col.to_string(), initial);

    let case_insensitive = directives.iter().any(|d| *d == IgnoreDirective::Case);

    for directive in directives {
        match directive {
            IgnoreDirective::Case => map_column(frame, target_col, |s| s.to_lowercase()),
            IgnoreDirective::Regex(pattern) => {
                delete_pattern(frame, target_col, pattern, case_insensitive)?
            }
            IgnoreDirective::NonLatin => map_column(frame, target_col, fold_nonlatin),
            IgnoreDirective::Titles => {
                let atoms: Vec<String> = TITLES.lines().map(regex::escape).collect();
                delete_pattern(frame, target_col, &atoms.join("|"), case_insensitive)?
            }
            IgnoreDirective::WordsLeading => {
                map_column(frame, target_col, |s| last_word(&s).to_string())
            }
            IgnoreDirective::WordsTailing => {
                map_column(frame, target_col, |s| first_word(&s).to_string())
            }
            IgnoreDirective::WordsOrder => map_column(frame, target_col, order_words),
            IgnoreDirective::NonAlpha => delete_pattern(frame, target_col, "[^a-zA-Z0-9]+", false)?,
        }
    }
    Ok(())
}

fn map_column(frame: &mut Frame, col: &str, f: impl Fn(String) -> String) {
    if let Some(values) = frame.get_mut(col) {
        for cell in values.iter_mut() {
            if let Some(s) = cell {
                *s = f(std::mem::take(s));
            }
        }
    }
}

fn delete_pattern(frame: &mut Frame, col: &str, pattern: &str, case_insensitive: bool) -> MatchResult<()> {
    let full_pattern = if case_insensitive {
        format!("(?i){pattern}")
    } else {
        pattern.to_string()
    };
    let re = Regex::new(&full_pattern).map_err(|e| MatchError::InvalidRegex(e.to_string()))?;
    map_column(frame, col, |s| re.replace_all(&s, "").into_owned());
    Ok(())
}

/// ASCII-folds diacritics by Unicode-decomposing each character and keeping
/// only its ASCII base, dropping combining marks entirely. This is
/// diacritic folding, not locale-aware collation.
fn fold_nonlatin(value: String) -> String {
    use unicode_normalization::UnicodeNormalization;
    value
        .nfkd()
        .filter(|c| c.is_ascii())
        .collect::<String>()
}

fn first_word(value: &str) -> &str {
    value.split(' ').next().unwrap_or("")
}

fn last_word(value: &str) -> &str {
    value.split(' ').next_back().unwrap_or("")
}

fn order_words(value: String) -> String {
    let mut words: Vec<&str> = value.split(' ').collect();
    words.sort_unstable();
    words.join(" ")
}
