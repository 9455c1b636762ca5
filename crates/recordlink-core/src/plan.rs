//! Planner/Driver: the declarative matching plan type
//! and the top-level entry point that runs it end to end — ingest, chain,
//! supplement, format, export.

use crate::block::BlockSpec;
use crate::callbacks::{Alert, Importance, Labeler, Progress};
use crate::error::{MatchError, MatchResult, Side};
use crate::methods::bilenko::LinkerBackend;
use crate::store::{self, Source};
use crate::supplement::JoinMode;
use crate::{chain, format};
use arrow::record_batch::RecordBatch;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Either a single value shared by every block, or one value per block.
/// Deserializes from either a bare value or a JSON/TOML array, so a plan
/// can give each block its own value or broadcast a single one to all.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: Clone> OneOrMany<T> {
    fn len_hint(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(values) => values.len(),
        }
    }

    fn into_vec(self, count: usize) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value; count],
            OneOrMany::Many(values) => values,
        }
    }
}

fn default_ignore() -> OneOrMany<Vec<String>> {
    OneOrMany::One(Vec::new())
}

fn default_threshold() -> OneOrMany<f64> {
    OneOrMany::One(0.6)
}

fn default_method() -> OneOrMany<String> {
    OneOrMany::One("literal".to_string())
}

fn default_join() -> String {
    "inner".to_string()
}

/// One field pairing within a block of the external plan-file format:
/// `{ "1": <name on side 1>, "2": <name on side 2> }`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldPairing {
    #[serde(rename = "1")]
    pub side1: String,
    #[serde(rename = "2")]
    pub side2: String,
}

fn default_block_method() -> String {
    "literal".to_string()
}

fn default_block_threshold() -> f64 {
    0.6
}

/// One block object of the external plan-file format: a bare JSON/TOML
/// array of these (no wrapping object, no broadcasting) is the plan shape a
/// host program loads from disk. Each object already names exactly one
/// block's field pairs, so there is no broadcast step between this and a
/// [`crate::block::BlockSpec`] — see [`blocks_from_file`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlanBlock {
    #[serde(default)]
    pub fields: Option<Vec<FieldPairing>>,
    #[serde(default = "default_block_method")]
    pub method: String,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_block_threshold")]
    pub threshold: f64,
}

/// Converts the external plan-file shape straight into blocks. Each array
/// element is already one block; `fields` omitted defaults to pairing every
/// column of each side positionally, the same all-columns default
/// [`broadcast`] applies for the in-process API.
pub fn blocks_from_file(
    plan: &[PlanBlock],
    all_columns1: &[String],
    all_columns2: &[String],
) -> Vec<BlockSpec> {
    plan.iter()
        .map(|block| {
            let (fields1, fields2) = match &block.fields {
                Some(pairs) => (
                    pairs.iter().map(|p| p.side1.clone()).collect(),
                    pairs.iter().map(|p| p.side2.clone()).collect(),
                ),
                None => (all_columns1.to_vec(), all_columns2.to_vec()),
            };
            BlockSpec {
                fields1,
                fields2,
                ignore: block.ignores.clone(),
                method: block.method.clone(),
                threshold: block.threshold,
            }
        })
        .collect()
}

/// A declarative matching plan: per-block field pairs, normalization,
/// method and threshold (each either shared across every block or given
/// once per block — see [`broadcast`]), the supplementing join mode, and
/// the output column list.
///
/// `fields1`/`fields2` are optional: when either is
/// omitted, [`broadcast`] defaults it to a single block naming every column
/// on that side, in ingestion order.
///
/// This is the broadcast-array shape of the in-process Planner/Driver API;
/// a plan *file* on disk instead uses [`PlanFile`]'s bare array-of-blocks
/// shape, unless the file itself is an object matching this struct (see
/// [`PlanFile`]'s untagged deserialization).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MatchingPlan {
    #[serde(default)]
    pub fields1: Option<OneOrMany<Vec<String>>>,
    #[serde(default)]
    pub fields2: Option<OneOrMany<Vec<String>>>,
    #[serde(default = "default_ignore")]
    pub ignore: OneOrMany<Vec<String>>,
    #[serde(default = "default_method")]
    pub method: OneOrMany<String>,
    #[serde(default = "default_threshold")]
    pub threshold: OneOrMany<f64>,
    #[serde(default = "default_join")]
    pub join: String,
    #[serde(default)]
    pub output: Vec<String>,
}

/// Expands a plan's per-parameter `OneOrMany` values into one [`BlockSpec`]
/// per block. `blocks_number` is the largest list length any parameter
/// supplied (a bare/one-element value broadcasts to that count).
/// `all_columns1`/`all_columns2` are used verbatim as the single-block
/// default when `fields1`/`fields2` is omitted from the plan.
pub fn broadcast(
    plan: &MatchingPlan,
    all_columns1: &[String],
    all_columns2: &[String],
) -> MatchResult<Vec<BlockSpec>> {
    let fields1 = plan
        .fields1
        .clone()
        .unwrap_or_else(|| OneOrMany::One(all_columns1.to_vec()));
    let fields2 = plan
        .fields2
        .clone()
        .unwrap_or_else(|| OneOrMany::One(all_columns2.to_vec()));

    let blocks_number = [
        fields1.len_hint(),
        fields2.len_hint(),
        plan.ignore.len_hint(),
        plan.method.len_hint(),
        plan.threshold.len_hint(),
    ]
    .into_iter()
    .max()
    .unwrap_or(1)
    .max(1);

    let fields1 = fields1.into_vec(blocks_number);
    let fields2 = fields2.into_vec(blocks_number);
    let ignore = plan.ignore.clone().into_vec(blocks_number);
    let method = plan.method.clone().into_vec(blocks_number);
    let threshold = plan.threshold.clone().into_vec(blocks_number);

    if [fields1.len(), fields2.len(), ignore.len(), method.len(), threshold.len()]
        .iter()
        .any(|&len| len != blocks_number)
    {
        return Err(MatchError::FieldCountMismatch { block: blocks_number });
    }

    Ok((0..blocks_number)
        .map(|i| BlockSpec {
            fields1: fields1[i].clone(),
            fields2: fields2[i].clone(),
            ignore: ignore[i].clone(),
            method: method[i].clone(),
            threshold: threshold[i],
        })
        .collect())
}

/// The top-level shape a plan *file* is loaded from: either the external
/// format spec.md section 6 documents ("Plan shape") — a bare array of
/// block objects, each already naming its own fields/method/ignores/
/// threshold — or the broadcast-array object shape ([`MatchingPlan`]) used
/// by in-process callers who want to express "one value shared by every
/// block" directly. Which variant a file uses is resolved purely from its
/// JSON/TOML shape (array vs. object); no tag is written to disk.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PlanFile {
    Blocks(Vec<PlanBlock>),
    Broadcast(MatchingPlan),
}

impl PlanFile {
    /// The join mode this plan file requests. The array-of-blocks shape has
    /// no place to carry this (spec.md section 6 documents the plan shape
    /// as blocks only), so it defaults to `"inner"`, same as an omitted
    /// `join` key on the object shape.
    pub fn join(&self) -> &str {
        match self {
            PlanFile::Blocks(_) => "inner",
            PlanFile::Broadcast(plan) => &plan.join,
        }
    }

    /// The plan's output column list, or empty (meaning the all-side-1-
    /// then-all-side-2 default) for the array-of-blocks shape.
    pub fn output(&self) -> &[String] {
        match self {
            PlanFile::Blocks(_) => &[],
            PlanFile::Broadcast(plan) => &plan.output,
        }
    }

    /// Resolves this plan file into one [`BlockSpec`] per block: a direct,
    /// broadcast-free conversion for the array-of-blocks shape, or
    /// [`broadcast`] for the object shape.
    pub fn blocks(&self, all_columns1: &[String], all_columns2: &[String]) -> MatchResult<Vec<BlockSpec>> {
        match self {
            PlanFile::Blocks(blocks) => Ok(blocks_from_file(blocks, all_columns1, all_columns2)),
            PlanFile::Broadcast(plan) => broadcast(plan, all_columns1, all_columns2),
        }
    }
}

/// Runs a complete match: ingests both sources, chains the plan's blocks,
/// supplements per the join mode, formats the output columns, and exports
/// as Arrow.
#[allow(clippy::too_many_arguments)]
pub fn run(
    source1: Source,
    source2: Source,
    plan: &PlanFile,
    progress: &mut dyn Progress,
    alert: &mut dyn Alert,
    labeler: &mut dyn Labeler,
    linker: &mut dyn LinkerBackend,
) -> MatchResult<RecordBatch> {
    let (store1, map1) = store::ingest(source1, Side::One)?;
    let (store2, map2) = store::ingest(source2, Side::Two)?;

    let all_columns1: Vec<String> = map1.keys().cloned().collect();
    let all_columns2: Vec<String> = map2.keys().cloned().collect();
    let blocks = plan.blocks(&all_columns1, &all_columns2)?;
    let join_mode = JoinMode::parse(plan.join())?;

    for (i, block) in blocks.iter().enumerate() {
        alert.alert(
            &format!(
                "block {i}: comparing {:?} to {:?} via {} (threshold {})",
                block.fields1, block.fields2, block.method, block.threshold
            ),
            Importance::Info,
        );
    }

    let matched = chain::run(
        &blocks,
        &store1.frame,
        &map1,
        &store1.id_column,
        &store2.frame,
        &map2,
        &store2.id_column,
        progress,
        alert,
        labeler,
        linker,
    )?;

    let supplemented = crate::supplement::run(
        &matched,
        &store1.frame,
        &store1.id_column,
        &store2.frame,
        &store2.id_column,
        join_mode,
    );

    let degree_columns: Vec<String> = (0..blocks.len()).map(|i| format!("_block{i}_degree")).collect();
    let formatted = format::run(&supplemented, &map1, &map2, &degree_columns, plan.output(), alert)?;

    let ordered_columns: Vec<String> = formatted.keys().cloned().collect();
    store::frame_to_arrow(&formatted, &ordered_columns).map_err(|e| MatchError::ExportFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_expands_scalar_params_to_every_block() {
        let plan = MatchingPlan {
            fields1: Some(OneOrMany::Many(vec![vec!["a".to_string()], vec!["b".to_string()]])),
            fields2: Some(OneOrMany::Many(vec![vec!["c".to_string()], vec!["d".to_string()]])),
            ignore: OneOrMany::One(Vec::new()),
            method: OneOrMany::One("literal".to_string()),
            threshold: OneOrMany::One(1.0),
            join: "inner".to_string(),
            output: Vec::new(),
        };
        let blocks = broadcast(&plan, &[], &[]).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].method, "literal");
        assert_eq!(blocks[1].method, "literal");
        assert_eq!(blocks[1].fields1, vec!["b".to_string()]);
    }

    #[test]
    fn broadcast_rejects_mismatched_list_lengths() {
        let plan = MatchingPlan {
            fields1: Some(OneOrMany::Many(vec![vec!["a".to_string()], vec!["b".to_string()]])),
            fields2: Some(OneOrMany::One(vec!["c".to_string()])),
            ignore: OneOrMany::One(Vec::new()),
            method: OneOrMany::Many(vec!["literal".to_string(), "literal".to_string(), "literal".to_string()]),
            threshold: OneOrMany::One(1.0),
            join: "inner".to_string(),
            output: Vec::new(),
        };
        let err = broadcast(&plan, &[], &[]).unwrap_err();
        assert!(matches!(err, MatchError::FieldCountMismatch { .. }));
    }

    #[test]
    fn single_block_plan_deserializes_from_json() {
        let json = r#"{
            "fields1": ["name"],
            "fields2": ["person"],
            "method": "literal"
        }"#;
        let plan: MatchingPlan = serde_json::from_str(json).unwrap();
        let blocks = broadcast(&plan, &[], &[]).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].threshold, 0.6);
        assert_eq!(plan.join, "inner");
    }

    #[test]
    fn missing_fields_default_to_every_column_on_that_side() {
        let json = r#"{"method": "literal"}"#;
        let plan: MatchingPlan = serde_json::from_str(json).unwrap();
        let all1 = vec!["name".to_string(), "city".to_string()];
        let all2 = vec!["person".to_string()];
        let blocks = broadcast(&plan, &all1, &all2).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].fields1, all1);
        assert_eq!(blocks[0].fields2, all2);
    }

    #[test]
    fn missing_method_defaults_to_literal() {
        let json = r#"{"fields1": ["name"], "fields2": ["person"]}"#;
        let plan: MatchingPlan = serde_json::from_str(json).unwrap();
        let blocks = broadcast(&plan, &[], &[]).unwrap();
        assert_eq!(blocks[0].method, "literal");
    }

    #[test]
    fn array_of_block_objects_deserializes_as_plan_file_blocks() {
        let json = r#"[
            {"fields": [{"1": "name", "2": "person"}], "method": "jaro-winkler", "threshold": 0.8},
            {"method": "literal"}
        ]"#;
        let plan: PlanFile = serde_json::from_str(json).unwrap();
        assert!(matches!(plan, PlanFile::Blocks(_)));
        assert_eq!(plan.join(), "inner");
        assert!(plan.output().is_empty());

        let blocks = plan.blocks(&["name".to_string()], &["person".to_string()]).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].fields1, vec!["name".to_string()]);
        assert_eq!(blocks[0].fields2, vec!["person".to_string()]);
        assert_eq!(blocks[0].method, "jaro-winkler");
        assert_eq!(blocks[0].threshold, 0.8);
        assert_eq!(blocks[1].method, "literal");
        assert_eq!(blocks[1].threshold, 0.6);
    }

    #[test]
    fn block_object_missing_fields_defaults_to_all_columns_pairwise() {
        let json = r#"[{"method": "literal"}]"#;
        let plan: PlanFile = serde_json::from_str(json).unwrap();
        let all1 = vec!["name".to_string(), "city".to_string()];
        let all2 = vec!["person".to_string()];
        let blocks = plan.blocks(&all1, &all2).unwrap();
        assert_eq!(blocks[0].fields1, all1);
        assert_eq!(blocks[0].fields2, all2);
    }

    #[test]
    fn object_shape_plan_file_still_deserializes_as_broadcast() {
        let json = r#"{"fields1": ["name"], "fields2": ["person"], "method": "literal", "join": "left-outer"}"#;
        let plan: PlanFile = serde_json::from_str(json).unwrap();
        assert!(matches!(plan, PlanFile::Broadcast(_)));
        assert_eq!(plan.join(), "left-outer");
        let blocks = plan.blocks(&[], &[]).unwrap();
        assert_eq!(blocks.len(), 1);
    }
}
