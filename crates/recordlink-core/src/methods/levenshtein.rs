//! `damerau-levenshtein`: normalized Damerau-Levenshtein similarity over a
//! cross product of both sides, thresholded.

use crate::callbacks::Progress;
use crate::frame::Frame;

/// Runs the cross-joined, threshold-filtered Damerau-Levenshtein comparison.
pub fn run(
    data1: &Frame,
    data2: &Frame,
    fields1: &[String],
    fields2: &[String],
    threshold: f64,
    degree_col: &str,
    progress: &mut dyn Progress,
) -> Frame {
    super::scored_match(
        data1,
        data2,
        fields1,
        fields2,
        threshold,
        degree_col,
        progress,
        super::Method::Levenshtein.label(),
        |a, b| strsim::normalized_damerau_levenshtein(a, b),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::NoopProgress;
    use crate::frame;

    #[test]
    fn keeps_only_pairs_at_or_above_threshold() {
        let mut data1 = Frame::new();
        data1.insert("f1".into(), vec![Some("kitten".into())]);
        let mut data2 = Frame::new();
        data2.insert("f2".into(), vec![Some("sitting".into()), Some("zzzzzzz".into())]);

        let result = run(
            &data1,
            &data2,
            &["f1".to_string()],
            &["f2".to_string()],
            0.5,
            "_degree",
            &mut NoopProgress,
        );
        assert_eq!(frame::len(&result), 1);
    }

    #[test]
    fn identical_strings_score_one() {
        let mut data1 = Frame::new();
        data1.insert("f1".into(), vec![Some("match".into())]);
        let mut data2 = Frame::new();
        data2.insert("f2".into(), vec![Some("match".into())]);

        let result = run(
            &data1,
            &data2,
            &["f1".to_string()],
            &["f2".to_string()],
            0.0,
            "_degree",
            &mut NoopProgress,
        );
        assert_eq!(result["_degree"], vec![Some("1.0".to_string())]);
    }
}
