//! Supplementer: applies the plan's join mode to the
//! chain's surviving pairs against the full two inputs, producing inner,
//! left-outer, right-outer or full-outer semantics.
//!
//! Invariant: for the same inputs,
//! `inner ⊆ left-outer ⊆ full-outer` and `inner ⊆ right-outer ⊆ full-outer`,
//! since every join mode starts from the same inner set and only adds
//! unmatched rows.

use crate::error::{MatchError, MatchResult};
use crate::frame::{self, Frame};

/// The four join modes a plan can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMode {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
}

impl JoinMode {
    pub fn parse(name: &str) -> MatchResult<Self> {
        match name {
            "inner" => Ok(JoinMode::Inner),
            "left-outer" => Ok(JoinMode::LeftOuter),
            "right-outer" => Ok(JoinMode::RightOuter),
            "full-outer" => Ok(JoinMode::FullOuter),
            other => Err(MatchError::UnknownJoin(other.to_string())),
        }
    }
}

/// Applies `mode` to the chain's surviving pairs (`matched`), supplementing
/// with unmatched rows from `data1`/`data2` as the mode requires.
pub fn run(matched: &Frame, data1: &Frame, id1: &str, data2: &Frame, id2: &str, mode: JoinMode) -> Frame {
    let supplement_left = matches!(mode, JoinMode::LeftOuter | JoinMode::FullOuter);
    let supplement_right = matches!(mode, JoinMode::RightOuter | JoinMode::FullOuter);

    let mut out = matched.clone();
    if supplement_left {
        out = append_unmatched_rows(&out, data1, id1);
    }
    if supplement_right {
        out = append_unmatched_rows(&out, data2, id2);
    }
    out
}

fn append_unmatched_rows(matched: &Frame, side: &Frame, id_col: &str) -> Frame {
    let matched_ids: std::collections::HashSet<&str> = matched
        .get(id_col)
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_deref())
        .collect();
    let unmatched_rows: Vec<usize> = (0..frame::len(side))
        .filter(|&r| {
            side[id_col][r]
                .as_deref()
                .map(|id| !matched_ids.contains(id))
                .unwrap_or(true)
        })
        .collect();
    let unmatched = frame::select_rows(side, &unmatched_rows);
    frame::concat_diagonal(&[matched.clone(), unmatched])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    fn sample() -> (Frame, Frame, Frame) {
        let mut data1 = Frame::new();
        data1.insert("_data1_id".into(), col(&["0", "1"]));
        data1.insert("_data1_col0".into(), col(&["Will", "Cal"]));

        let mut data2 = Frame::new();
        data2.insert("_data2_id".into(), col(&["0", "1"]));
        data2.insert("_data2_col0".into(), col(&["Will", "Dana"]));

        let mut matched = Frame::new();
        matched.insert("_data1_id".into(), col(&["0"]));
        matched.insert("_data1_col0".into(), col(&["Will"]));
        matched.insert("_data2_id".into(), col(&["0"]));
        matched.insert("_data2_col0".into(), col(&["Will"]));
        matched.insert("_block0_degree".into(), col(&["1.0"]));

        (matched, data1, data2)
    }

    #[test]
    fn inner_keeps_only_matched_rows() {
        let (matched, data1, data2) = sample();
        let result = run(&matched, &data1, "_data1_id", &data2, "_data2_id", JoinMode::Inner);
        assert_eq!(frame::len(&result), 1);
    }

    #[test]
    fn left_outer_adds_unmatched_left_rows() {
        let (matched, data1, data2) = sample();
        let result = run(&matched, &data1, "_data1_id", &data2, "_data2_id", JoinMode::LeftOuter);
        assert_eq!(frame::len(&result), 2);
        assert!(result["_data2_col0"].contains(&None));
    }

    #[test]
    fn full_outer_adds_both_unmatched_sides() {
        let (matched, data1, data2) = sample();
        let result = run(&matched, &data1, "_data1_id", &data2, "_data2_id", JoinMode::FullOuter);
        assert_eq!(frame::len(&result), 3);
    }

    #[test]
    fn inner_is_subset_of_left_outer_and_full_outer() {
        let (matched, data1, data2) = sample();
        let inner = run(&matched, &data1, "_data1_id", &data2, "_data2_id", JoinMode::Inner);
        let left = run(&matched, &data1, "_data1_id", &data2, "_data2_id", JoinMode::LeftOuter);
        let full = run(&matched, &data1, "_data1_id", &data2, "_data2_id", JoinMode::FullOuter);
        assert!(frame::len(&inner) <= frame::len(&left));
        assert!(frame::len(&left) <= frame::len(&full));
    }

    #[test]
    fn unknown_join_mode_is_an_error() {
        assert!(matches!(JoinMode::parse("cross"), Err(MatchError::UnknownJoin(_))));
    }
}
