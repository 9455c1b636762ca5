//! `double-metaphone`: phonetic equality on the primary/alternate Double
//! Metaphone codes of each side's connector string. A pair matches if any of
//! the four (primary/alternate) combinations coincide, since Double
//! Metaphone encodes two plausible pronunciations per word and either one
//! coinciding should count as a match.

use crate::callbacks::Progress;
use crate::frame::{self, Frame};
use rphonetic::DoubleMetaphone;

const PRIMARY1: &str = "_metaphone_primary1";
const ALTERNATE1: &str = "_metaphone_alternate1";
const PRIMARY2: &str = "_metaphone_primary2";
const ALTERNATE2: &str = "_metaphone_alternate2";

/// Encodes one cell: split on ASCII space, run Double Metaphone per word,
/// then rejoin the per-word primary codes and the per-word alternate codes
/// into two space-separated strings.
fn encode_cell(text: &str, encoder: &DoubleMetaphone) -> (String, String) {
    let mut primary_words = Vec::new();
    let mut alternate_words = Vec::new();
    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let codes = encoder.double_metaphone(word);
        primary_words.push(codes.primary().to_string());
        alternate_words.push(codes.alternate().to_string());
    }
    (primary_words.join(" "), alternate_words.join(" "))
}

/// Encodes each field's cell independently (so word-splitting never crosses
/// a field boundary), then joins the per-field primary codes — and,
/// separately, the per-field alternate codes — across fields with the same
/// `|` separator `build_connector` uses for the scored methods.
fn encode_connector(frame: &Frame, fields: &[String], encoder: &DoubleMetaphone) -> (Vec<Option<String>>, Vec<Option<String>>) {
    let n = frame::len(frame);
    let mut primary = Vec::with_capacity(n);
    let mut alternate = Vec::with_capacity(n);
    for row in 0..n {
        let mut primary_parts = Vec::with_capacity(fields.len());
        let mut alternate_parts = Vec::with_capacity(fields.len());
        for field in fields {
            let text = frame[field][row].clone().unwrap_or_default();
            let (p, a) = encode_cell(&text, encoder);
            primary_parts.push(p);
            alternate_parts.push(a);
        }
        primary.push(Some(primary_parts.join("|")));
        alternate.push(Some(alternate_parts.join("|")));
    }
    (primary, alternate)
}

/// Runs the phonetic comparison. `rid1`/`rid2` are the row-id columns used
/// to dedup the four join combinations down to one row per matching pair.
pub fn run(
    data1: &Frame,
    data2: &Frame,
    fields1: &[String],
    fields2: &[String],
    rid1: &str,
    rid2: &str,
    degree_col: &str,
    progress: &mut dyn Progress,
) -> Frame {
    progress.begin(super::Method::Metaphone.label(), 6);
    let encoder = DoubleMetaphone::default();
    progress.tick();

    let (p1, a1) = encode_connector(data1, fields1, &encoder);
    progress.tick();
    let (p2, a2) = encode_connector(data2, fields2, &encoder);
    progress.tick();

    let mut left = data1.clone();
    left.insert(PRIMARY1.to_string(), p1);
    left.insert(ALTERNATE1.to_string(), a1);
    let mut right = data2.clone();
    right.insert(PRIMARY2.to_string(), p2);
    right.insert(ALTERNATE2.to_string(), a2);
    progress.tick();

    let combinations = [
        (PRIMARY1, PRIMARY2),
        (PRIMARY1, ALTERNATE2),
        (ALTERNATE1, PRIMARY2),
        (ALTERNATE1, ALTERNATE2),
    ];
    let parts: Vec<Frame> = combinations
        .iter()
        .map(|(lk, rk)| frame::inner_join(&left, lk, &right, rk))
        .collect();
    progress.tick();

    let mut combined = frame::concat_diagonal(&parts);
    combined = frame::dedup_by(&combined, &[rid1.to_string(), rid2.to_string()]);
    for key in [PRIMARY1, ALTERNATE1, PRIMARY2, ALTERNATE2] {
        combined.remove(key);
    }
    frame::with_literal_column(&mut combined, degree_col, Some("1.0"));
    progress.tick();
    combined
}
