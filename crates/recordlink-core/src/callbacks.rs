//! Capability interfaces passed into the engine as plain values, not global
//! hooks.

use indexmap::IndexMap;

/// Coarse-grained progress reporting. A method calls [`Progress::begin`]
/// once per stage naming how many ticks it will report, then [`Progress::tick`]
/// that many times. Milestone counts are small and fixed per method:
/// 2 for `literal`, 3 for `bilenko`, 4 for `levenshtein`/`jaro`,
/// 6 for `metaphone`.
pub trait Progress {
    fn begin(&mut self, label: &str, total: usize);
    fn tick(&mut self);
}

/// A [`Progress`] that discards everything; the default when no progress
/// callback is supplied.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl Progress for NoopProgress {
    fn begin(&mut self, _label: &str, _total: usize) {}
    fn tick(&mut self) {}
}

/// Severity of an [`Alert`] message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    Info,
    Warning,
}

/// Diagnostic / non-fatal-warning sink. Disambiguated output columns and
/// `bilenko`'s "insufficient training" and "least populated class" notices
/// are reported this way rather than as errors.
pub trait Alert {
    fn alert(&mut self, message: &str, importance: Importance);
}

impl<F: FnMut(&str, Importance)> Alert for F {
    fn alert(&mut self, message: &str, importance: Importance) {
        self(message, importance)
    }
}

/// An [`Alert`] that discards everything.
#[derive(Debug, Default)]
pub struct NoopAlert;

impl Alert for NoopAlert {
    fn alert(&mut self, _message: &str, _importance: Importance) {}
}

/// A candidate pair presented to a human labeler during `bilenko`'s active
/// learning loop: the match-field values on each side, in field order.
#[derive(Debug, Clone)]
pub struct UncertainPair {
    pub fields1: IndexMap<String, String>,
    pub fields2: IndexMap<String, String>,
}

/// The label a human (or automated stand-in) assigns to an [`UncertainPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Match,
    Distinct,
    /// Counts toward both the match and distinct classes for the purpose of
    /// checking whether both have been observed, without being used as
    /// conflicting training content.
    Skip,
    /// Ends the labeling loop.
    Finish,
}

/// Raised by a [`Labeler`] to signal that labeling was interrupted (e.g. a
/// keyboard interrupt in an interactive UI collaborator). The engine turns
/// this into [`crate::error::MatchError::LabelingCancelled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// The thin UI collaborator this engine does not own: presents uncertain
/// pairs and collects labels. The engine owns only the active-learning loop
/// that drives it.
pub trait Labeler {
    fn label(&mut self, pair: &UncertainPair) -> Result<Label, Cancelled>;
}
