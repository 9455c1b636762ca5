use recordlink_core::{JoinMode, Method};
use rstest::rstest;

#[rstest]
#[case("literal", Method::Literal, false, "literal matching")]
#[case("damerau-levenshtein", Method::Levenshtein, true, "damerau-levenshtein matching")]
#[case("jaro-winkler", Method::Jaro, true, "jaro-winkler matching")]
#[case("double-metaphone", Method::Metaphone, false, "double-metaphone matching")]
#[case("bilenko", Method::Bilenko, true, "bilenko matching")]
fn external_method_name_resolves_to_expected_variant(
    #[case] name: &str,
    #[case] expected: Method,
    #[case] uses_threshold: bool,
    #[case] label: &str,
) {
    let parsed = Method::parse(name).unwrap();
    assert_eq!(parsed, expected);
    assert_eq!(parsed.uses_threshold(), uses_threshold);
    assert_eq!(parsed.label(), label);
}

#[rstest]
#[case("inner", JoinMode::Inner)]
#[case("left-outer", JoinMode::LeftOuter)]
#[case("right-outer", JoinMode::RightOuter)]
#[case("full-outer", JoinMode::FullOuter)]
fn external_join_name_resolves_to_expected_mode(#[case] name: &str, #[case] expected: JoinMode) {
    assert_eq!(JoinMode::parse(name).unwrap(), expected);
}
