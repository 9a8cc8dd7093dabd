//! Result normalizer tests.

use serde_json::json;

use mailtriage::analysis::normalize::normalize;
use mailtriage::analysis::{AnalysisResult, RawAnalysis};

fn normalized(value: serde_json::Value) -> AnalysisResult {
    normalize(&RawAnalysis::from_value(value))
}

#[test]
fn empty_record_yields_defaults() {
    let result = normalized(json!({}));
    assert_eq!(result.summary_lines, ["", "", "", "", ""].map(String::from));
    assert_eq!(result.category, "General");
    assert_eq!(result.urgency, "Normal");
    assert_eq!(result.action_required, "No");
}

#[test]
fn non_object_yields_defaults() {
    for value in [json!(null), json!("text"), json!([1, 2]), json!(42)] {
        let result = normalized(value);
        assert_eq!(result, normalized(json!({})));
    }
}

#[test]
fn short_summary_is_padded_with_last_line() {
    let result = normalized(json!({"summary_lines": ["a", "b"]}));
    assert_eq!(result.summary_lines, ["a", "b", "b", "b", "b"].map(String::from));
}

#[test]
fn long_summary_is_truncated() {
    let result = normalized(json!({"summary_lines": ["1", "2", "3", "4", "5", "6", "7"]}));
    assert_eq!(result.summary_lines, ["1", "2", "3", "4", "5"].map(String::from));
}

#[test]
fn entries_are_trimmed_and_stringified() {
    let result = normalized(json!({"summary_lines": ["  padded  ", 7, true]}));
    assert_eq!(
        result.summary_lines,
        ["padded", "7", "true", "true", "true"].map(String::from)
    );
}

#[test]
fn summary_string_is_split_into_lines() {
    let result = normalized(json!({"summary": "- first\n\n* second\n  third -  "}));
    assert_eq!(
        result.summary_lines,
        ["first", "second", "third", "third", "third"].map(String::from)
    );
}

#[test]
fn summary_lines_preferred_over_summary() {
    let result = normalized(json!({"summary_lines": ["kept"], "summary": "ignored"}));
    assert_eq!(result.summary_lines[0], "kept");
}

#[test]
fn empty_summary_lines_falls_back_to_summary() {
    let result = normalized(json!({"summary_lines": [], "summary": "from summary"}));
    assert_eq!(result.summary_lines[0], "from summary");
}

#[test]
fn non_sequence_summary_becomes_empty() {
    let result = normalized(json!({"summary_lines": {"a": 1}}));
    assert_eq!(result.summary_lines, ["", "", "", "", ""].map(String::from));
}

#[test]
fn labels_pass_through_unvalidated() {
    let result = normalized(json!({"category": "Legal", "urgency": "Whenever"}));
    assert_eq!(result.category, "Legal");
    assert_eq!(result.urgency, "Whenever");
}

#[test]
fn blank_labels_use_defaults() {
    let result = normalized(json!({"category": "", "urgency": null}));
    assert_eq!(result.category, "General");
    assert_eq!(result.urgency, "Normal");
}

#[test]
fn truthy_action_strings_coerce_to_yes() {
    assert_eq!(normalized(json!({"action_required": "TRUE"})).action_required, "Yes");
    assert_eq!(normalized(json!({"action": "y"})).action_required, "Yes");
    assert_eq!(normalized(json!({"action_required": " Yes "})).action_required, "Yes");
    assert_eq!(normalized(json!({"action_required": true})).action_required, "Yes");
}

#[test]
fn other_action_values_coerce_to_no() {
    assert_eq!(normalized(json!({"action_required": "no"})).action_required, "No");
    assert_eq!(normalized(json!({"action_required": "maybe"})).action_required, "No");
    assert_eq!(normalized(json!({"action_required": false})).action_required, "No");
    assert_eq!(normalized(json!({})).action_required, "No");
}

#[test]
fn action_required_takes_precedence_over_action() {
    let result = normalized(json!({"action_required": "no", "action": "yes"}));
    assert_eq!(result.action_required, "No");
}

#[test]
fn normalizing_a_canonical_record_is_a_no_op() {
    let canonical = normalized(json!({
        "summary_lines": ["a", "b", "", "", ""],
        "category": "Finance",
        "urgency": "High",
        "action_required": "Yes",
    }));
    let again = normalize(&RawAnalysis::from(&canonical));
    assert_eq!(again, canonical);
}

#[test]
fn summary_string_splits_on_every_line_terminator() {
    let result = normalized(json!({"summary": "- one\r* two\u{2028}three\u{0c}four\u{85}five"}));
    assert_eq!(
        result.summary_lines,
        ["one", "two", "three", "four", "five"].map(String::from)
    );
}

#[test]
fn entries_are_trimmed_of_information_separators() {
    let result = normalized(json!({"summary_lines": ["\u{1f}kept\u{1c}"], "action_required": "\u{1f}yes"}));
    assert_eq!(result.summary_lines[0], "kept");
    assert_eq!(result.action_required, "Yes");
}
