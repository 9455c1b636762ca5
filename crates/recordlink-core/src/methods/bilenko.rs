//! `bilenko`: a supervised, actively-learned linker. No Rust crate ships an
//! interactive active-learning pairwise classifier, so the external linker
//! is modeled as a pluggable [`LinkerBackend`] trait; [`HeuristicLinker`], a
//! dependency-free fallback, is the concrete default. A caller who wants a
//! trained classifier supplies their own `LinkerBackend`.

use crate::callbacks::{Alert, Importance, Labeler, Progress, UncertainPair};
use crate::error::MatchResult;
use crate::frame::{self, Frame};

/// Candidate pairs are sampled for labeling up to this many.
pub const TRAINING_SAMPLE_SIZE: usize = 15_000;

/// A trainable pairwise classifier. [`crate::methods::bilenko::run`] drives
/// the active-learning loop and hands the backend labeled examples; the
/// backend owns how (or whether) it actually learns from them.
pub trait LinkerBackend {
    fn train(&mut self, matches: &[UncertainPair], distinct: &[UncertainPair]) -> MatchResult<()>;
    fn score(&self, pair: &UncertainPair) -> f64;
    fn is_trained(&self) -> bool;
}

/// Default [`LinkerBackend`]: scores a pair by the mean Jaro-Winkler
/// similarity across its shared fields. Training only records whether both
/// classes were observed; it does not fit any parameters, since there is no
/// `dedupe`-equivalent crate to delegate to.
#[derive(Debug, Default)]
pub struct HeuristicLinker {
    trained: bool,
}

impl HeuristicLinker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LinkerBackend for HeuristicLinker {
    fn train(&mut self, matches: &[UncertainPair], distinct: &[UncertainPair]) -> MatchResult<()> {
        self.trained = !matches.is_empty() && !distinct.is_empty();
        Ok(())
    }

    fn score(&self, pair: &UncertainPair) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;
        for (key, v1) in &pair.fields1 {
            if let Some(v2) = pair.fields2.get(key) {
                total += strsim::jaro_winkler(v1, v2);
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }

    fn is_trained(&self) -> bool {
        self.trained
    }
}

fn pair_at(
    data1: &Frame,
    data2: &Frame,
    field_names: &[String],
    fields1: &[String],
    fields2: &[String],
    lrow: usize,
    rrow: usize,
) -> UncertainPair {
    let mut fields1_map = indexmap::IndexMap::new();
    let mut fields2_map = indexmap::IndexMap::new();
    for ((name, f1), f2) in field_names.iter().zip(fields1).zip(fields2) {
        fields1_map.insert(name.clone(), data1[f1][lrow].clone().unwrap_or_default());
        fields2_map.insert(name.clone(), data2[f2][rrow].clone().unwrap_or_default());
    }
    UncertainPair {
        fields1: fields1_map,
        fields2: fields2_map,
    }
}

/// Runs the active-learning loop (sample, label until `Finish`/cancelled,
/// train), then scores and thresholds every candidate pair.
#[allow(clippy::too_many_arguments)]
pub fn run(
    data1: &Frame,
    data2: &Frame,
    field_names: &[String],
    fields1: &[String],
    fields2: &[String],
    threshold: f64,
    degree_col: &str,
    progress: &mut dyn Progress,
    alert: &mut dyn Alert,
    labeler: &mut dyn Labeler,
    linker: &mut dyn LinkerBackend,
) -> MatchResult<Frame> {
    progress.begin(super::Method::Bilenko.label(), 3);

    let n1 = frame::len(data1);
    let n2 = frame::len(data2);
    let total_pairs = n1.saturating_mul(n2);
    let sample_size = total_pairs.min(TRAINING_SAMPLE_SIZE);

    if !linker.is_trained() {
        let mut matches = Vec::new();
        let mut distinct = Vec::new();
        let mut cursor = 0usize;
        let mut batch_end = sample_size;

        // Active-learning loop: label a batch, train, and if the trainer
        // comes back with too few examples of one class, alert and resume
        // labeling with whatever candidate pairs remain. Each pass strictly
        // grows `cursor` towards `total_pairs`, so this always terminates.
        loop {
            let mut user_finished = false;
            'sampling: for i in cursor..batch_end {
                let lrow = i / n2.max(1);
                let rrow = i % n2.max(1);
                let pair = pair_at(data1, data2, field_names, fields1, fields2, lrow, rrow);
                match labeler.label(&pair) {
                    Ok(crate::callbacks::Label::Match) => matches.push(pair),
                    Ok(crate::callbacks::Label::Distinct) => distinct.push(pair),
                    // Counts toward both classes, so a user who only ever
                    // skips still lets the trainer see both populated and
                    // the loop converges.
                    Ok(crate::callbacks::Label::Skip) => {
                        matches.push(pair.clone());
                        distinct.push(pair);
                    }
                    Ok(crate::callbacks::Label::Finish) => {
                        user_finished = true;
                        cursor = i + 1;
                        break 'sampling;
                    }
                    Err(crate::callbacks::Cancelled) => {
                        return Err(crate::error::MatchError::LabelingCancelled)
                    }
                }
            }
            if !user_finished {
                cursor = batch_end;
            }

            linker.train(&matches, &distinct)?;
            let insufficient = matches.is_empty() || distinct.is_empty();
            if !insufficient {
                break;
            }
            alert.alert(
                "least populated class has too few examples; more training will produce better results",
                Importance::Warning,
            );
            if cursor >= total_pairs {
                break;
            }
            batch_end = total_pairs;
        }
    }
    progress.tick();

    let pairs = frame::cross_join(data1, data2);
    progress.tick();

    let total = frame::len(&pairs);
    let mut kept_rows = Vec::new();
    let mut degrees = Vec::new();
    for row in 0..total {
        let lrow = row / n2.max(1);
        let rrow = row % n2.max(1);
        let pair = pair_at(data1, data2, field_names, fields1, fields2, lrow, rrow);
        let score = linker.score(&pair);
        if score >= threshold {
            kept_rows.push(row);
            degrees.push(Some(crate::degree::format_degree(score)));
        }
    }
    let mut result = frame::select_rows(&pairs, &kept_rows);
    result.insert(degree_col.to_string(), degrees);
    progress.tick();

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::{Cancelled, Label, NoopProgress, UncertainPair};

    struct AllMatchLabeler;
    impl Labeler for AllMatchLabeler {
        fn label(&mut self, _pair: &UncertainPair) -> Result<Label, Cancelled> {
            Ok(Label::Match)
        }
    }

    struct AllSkipLabeler;
    impl Labeler for AllSkipLabeler {
        fn label(&mut self, _pair: &UncertainPair) -> Result<Label, Cancelled> {
            Ok(Label::Skip)
        }
    }

    struct AlternatingLabeler {
        next_match: bool,
    }
    impl Labeler for AlternatingLabeler {
        fn label(&mut self, _pair: &UncertainPair) -> Result<Label, Cancelled> {
            self.next_match = !self.next_match;
            Ok(if self.next_match {
                Label::Match
            } else {
                Label::Distinct
            })
        }
    }

    fn sample_frames() -> (Frame, Frame) {
        let mut data1 = Frame::new();
        data1.insert("f1".into(), vec![Some("jon smith".into())]);
        let mut data2 = Frame::new();
        data2.insert("f2".into(), vec![Some("jon smith".into()), Some("zzz".into())]);
        (data1, data2)
    }

    #[test]
    fn heuristic_linker_untrained_without_both_classes() {
        let mut linker = HeuristicLinker::new();
        linker.train(&[], &[]).unwrap();
        assert!(!linker.is_trained());
    }

    #[test]
    fn cancellation_becomes_labeling_cancelled_error() {
        struct CancelImmediately;
        impl Labeler for CancelImmediately {
            fn label(&mut self, _pair: &UncertainPair) -> Result<Label, Cancelled> {
                Err(Cancelled)
            }
        }
        let (data1, data2) = sample_frames();
        let mut alert = crate::callbacks::NoopAlert;
        let mut labeler = CancelImmediately;
        let mut linker = HeuristicLinker::new();
        let err = run(
            &data1,
            &data2,
            &["name".to_string()],
            &["f1".to_string()],
            &["f2".to_string()],
            0.5,
            "_degree",
            &mut NoopProgress,
            &mut alert,
            &mut labeler,
            &mut linker,
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::MatchError::LabelingCancelled));
    }

    #[test]
    fn scores_and_filters_by_threshold() {
        let (data1, data2) = sample_frames();
        let mut alert = crate::callbacks::NoopAlert;
        let mut labeler = AlternatingLabeler { next_match: false };
        let mut linker = HeuristicLinker::new();
        let result = run(
            &data1,
            &data2,
            &["name".to_string()],
            &["f1".to_string()],
            &["f2".to_string()],
            0.9,
            "_degree",
            &mut NoopProgress,
            &mut alert,
            &mut labeler,
            &mut linker,
        )
        .unwrap();
        assert_eq!(frame::len(&result), 1);
    }

    #[test]
    fn unanimous_labels_trigger_least_populated_alert() {
        let (data1, data2) = sample_frames();
        let mut alerts = Vec::new();
        let mut alert_fn = |message: &str, importance: Importance| {
            alerts.push((message.to_string(), importance));
        };
        let mut labeler = AllMatchLabeler;
        let mut linker = HeuristicLinker::new();
        let _ = run(
            &data1,
            &data2,
            &["name".to_string()],
            &["f1".to_string()],
            &["f2".to_string()],
            0.5,
            "_degree",
            &mut NoopProgress,
            &mut alert_fn,
            &mut labeler,
            &mut linker,
        )
        .unwrap();
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn skip_counts_toward_both_classes_and_trains_immediately() {
        let (data1, data2) = sample_frames();
        let mut alerts = Vec::new();
        let mut alert_fn = |message: &str, importance: Importance| {
            alerts.push((message.to_string(), importance));
        };
        let mut labeler = AllSkipLabeler;
        let mut linker = HeuristicLinker::new();
        let _ = run(
            &data1,
            &data2,
            &["name".to_string()],
            &["f1".to_string()],
            &["f2".to_string()],
            0.5,
            "_degree",
            &mut NoopProgress,
            &mut alert_fn,
            &mut labeler,
            &mut linker,
        )
        .unwrap();
        assert!(linker.is_trained());
        assert!(alerts.is_empty());
    }
}
