use super::common::*;
use crate::workflows::profiling::scoring::{parse_numeral_for_tests, ScoringEngine, ScoringError};
use crate::workflows::profiling::WeightTable;

#[test]
fn score_is_weighted_sum_of_answers() {
    let engine = ScoringEngine::new(weight_table());
    let outcome = engine
        .score(&answers(&[("risk_tolerance", "4"), ("investment_horizon", "3")]))
        .expect("numeric answers score");

    assert!(approx(outcome.risk_score, 0.2 * 4.0 + 0.1 * 3.0));
    assert_eq!(outcome.components.len(), 2);
    assert!(outcome.unscored_keys.is_empty());
}

#[test]
fn unknown_keys_contribute_zero_and_are_reported() {
    let engine = ScoringEngine::new(weight_table());
    let with_unknown = engine
        .score(&answers(&[("risk_tolerance", "4"), ("crypto_appetite", "5")]))
        .expect("unknown key does not abort scoring");
    let without_unknown = engine
        .score(&answers(&[("risk_tolerance", "4")]))
        .expect("scores");

    assert!(approx(with_unknown.risk_score, without_unknown.risk_score));
    assert_eq!(with_unknown.unscored_keys, vec!["crypto_appetite".to_string()]);
    assert!(with_unknown
        .components
        .iter()
        .all(|component| component.question_key != "crypto_appetite"));
}

#[test]
fn unknown_keys_are_never_parsed() {
    let engine = ScoringEngine::new(weight_table());
    let outcome = engine
        .score(&answers(&[("free_text_comment", "likes bonds")]))
        .expect("unknown text answer is ignored");
    assert_eq!(outcome.risk_score, 0.0);
}

#[test]
fn excluded_identifier_fields_are_skipped() {
    let engine = ScoringEngine::new(weight_table());
    let outcome = engine
        .score(&answers(&[
            ("client_name", "Ada Lovelace"),
            ("account_number", "ACC-0042"),
            ("risk_tolerance", "2"),
        ]))
        .expect("identifiers are excluded before parsing");

    assert!(approx(outcome.risk_score, 0.4));
    assert!(outcome.unscored_keys.is_empty());
    assert_eq!(outcome.components.len(), 1);
}

#[test]
fn non_numeric_scored_answer_is_rejected() {
    let engine = ScoringEngine::new(weight_table());
    match engine.score(&answers(&[("risk_tolerance", "high")])) {
        Err(ScoringError::NonNumericAnswer { key, value }) => {
            assert_eq!(key, "risk_tolerance");
            assert_eq!(value, "high");
        }
        other => panic!("expected non-numeric error, got {other:?}"),
    }
}

#[test]
fn zero_weight_questions_are_recorded_but_do_not_move_the_score() {
    let table = WeightTable::new([("risk_tolerance", 0.2), ("notes_flag", 0.0)], []);
    let outcome = ScoringEngine::new(table)
        .score(&answers(&[("risk_tolerance", "1"), ("notes_flag", "9")]))
        .expect("scores");

    assert!(approx(outcome.risk_score, 0.2));
    assert!(outcome
        .components
        .iter()
        .any(|component| component.question_key == "notes_flag" && component.contribution == 0.0));
}

#[test]
fn non_negative_inputs_never_produce_negative_scores() {
    let table = WeightTable::standard();
    let engine = ScoringEngine::new(table.clone());

    for value in ["0", "0.5", "1", "2.75", "5", "100"] {
        let sheet = table
            .questions()
            .into_iter()
            .map(|question| (question.key, value.to_string()))
            .collect();
        let outcome = engine.score(&sheet).expect("numeric answers score");
        assert!(outcome.risk_score >= 0.0, "negative score for value {value}");
    }
}

#[test]
fn numerals_tolerate_whitespace_but_not_infinities() {
    assert_eq!(parse_numeral_for_tests(" 3.5 "), Some(3.5));
    assert_eq!(parse_numeral_for_tests("inf"), None);
    assert_eq!(parse_numeral_for_tests("NaN"), None);
    assert_eq!(parse_numeral_for_tests(""), None);
}

#[test]
fn overflowing_score_is_rejected() {
    let engine = ScoringEngine::new(WeightTable::new(
        [("leverage_appetite", 5.0), ("risk_tolerance", 0.2)],
        ["client_name"],
    ));
    let error = engine
        .score(&answers(&[("leverage_appetite", "1e308"), ("risk_tolerance", "4")]))
        .expect_err("score overflows");

    assert_eq!(error, ScoringError::NonFiniteScore);
}
