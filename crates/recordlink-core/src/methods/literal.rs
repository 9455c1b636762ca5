//! `literal`: an exact equi-join on the ignorant fields. Cheapest method,
//! and the only one that can use the hash-join path directly instead of a
//! cross product.

use crate::callbacks::Progress;
use crate::frame::{self, Frame};

/// Joins `data1`/`data2` on the composite key `fields1`/`fields2`, writing
/// `"1.0"` into `degree_col` for every surviving pair.
pub fn run(
    data1: &Frame,
    data2: &Frame,
    fields1: &[String],
    fields2: &[String],
    degree_col: &str,
    progress: &mut dyn Progress,
) -> Frame {
    progress.begin(super::Method::Literal.label(), 2);
    progress.tick();
    let mut joined = frame::inner_join_on(data1, fields1, data2, fields2);
    frame::with_literal_column(&mut joined, degree_col, Some("1.0"));
    progress.tick();
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::NoopProgress;

    #[test]
    fn matches_exact_values_only() {
        let mut data1 = Frame::new();
        data1.insert("f1".into(), vec![Some("abc".into()), Some("xyz".into())]);
        let mut data2 = Frame::new();
        data2.insert("f2".into(), vec![Some("abc".into()), Some("qqq".into())]);

        let result = run(
            &data1,
            &data2,
            &["f1".to_string()],
            &["f2".to_string()],
            "_degree",
            &mut NoopProgress,
        );
        assert_eq!(frame::len(&result), 1);
        assert_eq!(result["_degree"], vec![Some("1.0".to_string())]);
    }
}
