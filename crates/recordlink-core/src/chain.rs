//! Block Chainer: runs a plan's blocks in sequence,
//! each pruned by the previous block's surviving pairs, stopping as soon as
//! an intermediate result is empty.

use crate::block::{self, BlockSpec};
use crate::callbacks::{Alert, Labeler, Progress};
use crate::error::MatchResult;
use crate::frame::Frame;
use crate::methods::bilenko::LinkerBackend;
use crate::store::ColumnMap;

/// Runs every block in `blocks` in order, short-circuiting as soon as one
/// produces zero pairs. Returns the final surviving-pairs frame, which
/// carries one `_block{i}_degree` column per block that actually ran.
#[allow(clippy::too_many_arguments)]
pub fn run(
    blocks: &[BlockSpec],
    data1: &Frame,
    map1: &ColumnMap,
    id1: &str,
    data2: &Frame,
    map2: &ColumnMap,
    id2: &str,
    progress: &mut dyn Progress,
    alert: &mut dyn Alert,
    labeler: &mut dyn Labeler,
    linker: &mut dyn LinkerBackend,
) -> MatchResult<Frame> {
    let mut current: Option<Frame> = None;
    for (index, spec) in blocks.iter().enumerate() {
        let result = block::run(
            index,
            spec,
            data1,
            map1,
            id1,
            data2,
            map2,
            id2,
            current.as_ref(),
            progress,
            alert,
            labeler,
            linker,
        )?;
        let empty = crate::frame::len(&result) == 0;
        current = Some(result);
        if empty {
            break;
        }
    }
    Ok(current.unwrap_or_else(|| crate::frame::empty_with_columns([id1.to_string(), id2.to_string()])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::{Label, NoopAlert, NoopProgress, UncertainPair};
    use crate::error::Side;
    use crate::methods::bilenko::HeuristicLinker;
    use crate::store::{ingest, Source};
    use indexmap::IndexMap;

    struct NeverLabeler;
    impl crate::callbacks::Labeler for NeverLabeler {
        fn label(&mut self, _pair: &UncertainPair) -> Result<Label, crate::callbacks::Cancelled> {
            Ok(Label::Finish)
        }
    }

    fn sample() -> (Frame, ColumnMap, String, Frame, ColumnMap, String) {
        let mut cols1 = IndexMap::new();
        cols1.insert(
            "name".to_string(),
            vec!["Will".to_string(), "Cal".to_string(), "Dana".to_string()],
        );
        cols1.insert(
            "city".to_string(),
            vec!["NYC".to_string(), "LA".to_string(), "NYC".to_string()],
        );
        let (store1, map1) = ingest(Source::Columns(cols1), Side::One).unwrap();

        let mut cols2 = IndexMap::new();
        cols2.insert(
            "person".to_string(),
            vec!["Will".to_string(), "Cal".to_string()],
        );
        cols2.insert("town".to_string(), vec!["NYC".to_string(), "SF".to_string()]);
        let (store2, map2) = ingest(Source::Columns(cols2), Side::Two).unwrap();

        (store1.frame, map1, store1.id_column, store2.frame, map2, store2.id_column)
    }

    #[test]
    fn later_block_prunes_earlier_blocks_pairs() {
        let (data1, map1, id1, data2, map2, id2) = sample();
        let blocks = vec![
            BlockSpec {
                fields1: vec!["name".to_string()],
                fields2: vec!["person".to_string()],
                ignore: vec![],
                method: "literal".to_string(),
                threshold: 0.0,
            },
            BlockSpec {
                fields1: vec!["city".to_string()],
                fields2: vec!["town".to_string()],
                ignore: vec![],
                method: "literal".to_string(),
                threshold: 0.0,
            },
        ];
        let mut alert = NoopAlert;
        let mut labeler = NeverLabeler;
        let mut linker = HeuristicLinker::new();
        let result = run(
            &blocks,
            &data1,
            &map1,
            &id1,
            &data2,
            &map2,
            &id2,
            &mut NoopProgress,
            &mut alert,
            &mut labeler,
            &mut linker,
        )
        .unwrap();
        // "Will"/"NYC" matches on both blocks; "Cal"/"SF" fails block 2.
        assert_eq!(crate::frame::len(&result), 1);
        assert!(result.contains_key("_block0_degree"));
        assert!(result.contains_key("_block1_degree"));
    }

    #[test]
    fn empty_intermediate_result_stops_the_chain() {
        let (data1, map1, id1, data2, map2, id2) = sample();
        // "name" values never equal "town" values, so block 0 is empty and
        // block 1 must never run.
        let blocks = vec![
            BlockSpec {
                fields1: vec!["name".to_string()],
                fields2: vec!["town".to_string()],
                ignore: vec![],
                method: "literal".to_string(),
                threshold: 0.0,
            },
            BlockSpec {
                fields1: vec!["name".to_string()],
                fields2: vec!["person".to_string()],
                ignore: vec![],
                method: "literal".to_string(),
                threshold: 0.0,
            },
        ];

        let mut alert = NoopAlert;
        let mut labeler = NeverLabeler;
        let mut linker = HeuristicLinker::new();
        let result = run(
            &blocks,
            &data1,
            &map1,
            &id1,
            &data2,
            &map2,
            &id2,
            &mut NoopProgress,
            &mut alert,
            &mut labeler,
            &mut linker,
        )
        .unwrap();
        assert_eq!(crate::frame::len(&result), 0);
        assert!(!result.contains_key("_block1_degree"));
    }
}
