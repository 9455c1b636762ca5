//! Block Matcher: evaluates one block's field
//! comparisons with its configured method, then prunes the result down to
//! the parent block's surviving pairs, if there is a parent.

use crate::callbacks::{Alert, Labeler, Progress};
use crate::error::{MatchError, MatchResult, Side};
use crate::frame::{self, Frame};
use crate::ignorance::{self, IgnoreDirective};
use crate::methods::bilenko::LinkerBackend;
use crate::methods::Method;
use crate::store::ColumnMap;

/// One block of a matching plan: the field pairs to compare, how to
/// normalize them before comparing, and the method/threshold to compare
/// with.
#[derive(Debug, Clone)]
pub struct BlockSpec {
    pub fields1: Vec<String>,
    pub fields2: Vec<String>,
    pub ignore: Vec<String>,
    pub method: String,
    pub threshold: f64,
}

/// Restricts `frame` to the rows whose `id_col` value appears among
/// `parent`'s `parent_id_col` values — the blocking pruning step, applied
/// before the (possibly expensive) method runs
/// rather than after, so a `levenshtein`/`jaro` cross product downstream of
/// a cheap `literal` block only ever sees the survivors.
fn prune_to_parent(frame: &Frame, id_col: &str, parent: &Frame, parent_id_col: &str) -> Frame {
    let surviving: std::collections::HashSet<&str> = parent[parent_id_col]
        .iter()
        .filter_map(|v| v.as_deref())
        .collect();
    frame::filter_rows(frame, |row| {
        frame[id_col][row].as_deref().is_some_and(|v| surviving.contains(v))
    })
}

fn resolve_fields(names: &[String], map: &ColumnMap, side: Side) -> MatchResult<Vec<String>> {
    names
        .iter()
        .map(|name| {
            map.get(name).cloned().ok_or_else(|| MatchError::UnknownField {
                side,
                field: name.clone(),
            })
        })
        .collect()
}

/// Writes an `_ignorant` column for each of `handles`, under a fresh name
/// derived from `prefix`, on a scratch copy of `frame` (the original is left
/// untouched so later blocks can still see raw field values).
fn ignorant_columns(
    frame: &Frame,
    handles: &[String],
    directives: &[IgnoreDirective],
    prefix: &str,
) -> MatchResult<(Frame, Vec<String>)> {
    let mut scratch = frame.clone();
    let mut ignorant_handles = Vec::with_capacity(handles.len());
    for (i, handle) in handles.iter().enumerate() {
        let target = format!("{prefix}_{i}");
        ignorance::apply_ignorance(&mut scratch, handle, &target, directives)?;
        ignorant_handles.push(target);
    }
    Ok((scratch, ignorant_handles))
}

/// Runs block `index` (0-based), returning the surviving pairs with this
/// block's own `_block{index}_degree` column appended, and every earlier
/// block's degree columns still present when `parent` is `Some`.
#[allow(clippy::too_many_arguments)]
pub fn run(
    index: usize,
    spec: &BlockSpec,
    data1: &Frame,
    map1: &ColumnMap,
    id1: &str,
    data2: &Frame,
    map2: &ColumnMap,
    id2: &str,
    parent: Option<&Frame>,
    progress: &mut dyn Progress,
    alert: &mut dyn Alert,
    labeler: &mut dyn Labeler,
    linker: &mut dyn LinkerBackend,
) -> MatchResult<Frame> {
    if spec.fields1.len() != spec.fields2.len() {
        return Err(MatchError::FieldCountMismatch { block: index });
    }
    if !(0.0..=1.0).contains(&spec.threshold) {
        return Err(MatchError::ThresholdOutOfRange(spec.threshold));
    }

    let method = Method::parse(&spec.method)?;
    let directives = ignorance::parse_ignores(&spec.ignore)?;

    let handles1 = resolve_fields(&spec.fields1, map1, Side::One)?;
    let handles2 = resolve_fields(&spec.fields2, map2, Side::Two)?;

    let (pruned1, pruned2);
    let (data1, data2): (&Frame, &Frame) = match parent {
        Some(parent) => {
            pruned1 = prune_to_parent(data1, id1, parent, id1);
            pruned2 = prune_to_parent(data2, id2, parent, id2);
            (&pruned1, &pruned2)
        }
        None => (data1, data2),
    };

    let (scratch1, ignorant1) =
        ignorant_columns(data1, &handles1, &directives, &format!("_block{index}_left"))?;
    let (scratch2, ignorant2) =
        ignorant_columns(data2, &handles2, &directives, &format!("_block{index}_right"))?;

    let degree_col = format!("_block{index}_degree");
    let mut result = match method {
        Method::Literal => crate::methods::literal::run(
            &scratch1, &scratch2, &ignorant1, &ignorant2, &degree_col, progress,
        ),
        Method::Levenshtein => crate::methods::levenshtein::run(
            &scratch1, &scratch2, &ignorant1, &ignorant2, spec.threshold, &degree_col, progress,
        ),
        Method::Jaro => crate::methods::jaro::run(
            &scratch1, &scratch2, &ignorant1, &ignorant2, spec.threshold, &degree_col, progress,
        ),
        Method::Metaphone => crate::methods::metaphone::run(
            &scratch1, &scratch2, &ignorant1, &ignorant2, id1, id2, &degree_col, progress,
        ),
        Method::Bilenko => crate::methods::bilenko::run(
            &scratch1,
            &scratch2,
            &spec.fields1,
            &ignorant1,
            &ignorant2,
            spec.threshold,
            &degree_col,
            progress,
            alert,
            labeler,
            linker,
        )?,
    };

    for handle in ignorant1.iter().chain(ignorant2.iter()) {
        result.remove(handle);
    }

    if let Some(parent) = parent {
        let keys = [id1.to_string(), id2.to_string()];
        result = frame::inner_join_carry(&result, &keys, parent, &keys);
        if frame::len(&result) == 0 {
            alert.alert(
                &format!("block {index}: no candidate pairs survived pruning by the previous block"),
                crate::callbacks::Importance::Info,
            );
        }
    }

    Ok(result)
}
