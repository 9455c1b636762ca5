//! `jaro-winkler`: Jaro-Winkler similarity over a cross product of both
//! sides, thresholded.

use crate::callbacks::Progress;
use crate::frame::Frame;

/// Runs the cross-joined, threshold-filtered Jaro-Winkler comparison.
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
        super::Method::Jaro.label(),
        |a, b| strsim::jaro_winkler(a, b),
    )
}
