//! Fuzzy record-linkage matching engine for two tabular datasets.
//!
//! A [`plan::MatchingPlan`] describes a sequence of blocks; each block
//! compares a pair of fields with a [`methods::Method`] after running them
//! through the [`ignorance`] pipeline, and later blocks prune their
//! candidate pairs down to the ones the previous block kept ([`chain`]).
//! The chain's surviving pairs are supplemented per the plan's join mode
//! ([`supplement`]), renamed into user-facing output columns
//! ([`format`]), and exported as an Arrow `RecordBatch`.

pub mod block;
pub mod callbacks;
pub mod chain;
pub mod degree;
pub mod error;
pub mod format;
pub mod frame;
pub mod ignorance;
pub mod kernels;
pub mod methods;
pub mod plan;
pub mod store;
pub mod supplement;

pub use block::BlockSpec;
pub use callbacks::{Alert, Cancelled, Importance, Label, Labeler, NoopAlert, NoopProgress, Progress, UncertainPair};
pub use error::{MatchError, MatchResult, Side};
pub use frame::Frame;
pub use methods::bilenko::{HeuristicLinker, LinkerBackend};
pub use methods::Method;
pub use plan::{blocks_from_file, broadcast, FieldPairing, MatchingPlan, OneOrMany, PlanBlock, PlanFile};
pub use store::{ColumnMap, ColumnStore, Source};
pub use supplement::JoinMode;

/// Runs a complete match end to end. See [`plan::run`].
pub fn run(
    source1: Source,
    source2: Source,
    plan: &PlanFile,
    progress: &mut dyn Progress,
    alert: &mut dyn Alert,
    labeler: &mut dyn Labeler,
    linker: &mut dyn LinkerBackend,
) -> MatchResult<arrow::record_batch::RecordBatch> {
    plan::run(source1, source2, plan, progress, alert, labeler, linker)
}
