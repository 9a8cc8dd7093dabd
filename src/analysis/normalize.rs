//! Conversion of any [`RawAnalysis`] into the canonical [`AnalysisResult`].
//!
//! This is the compatibility boundary between model output and heuristic
//! output. It never fails: missing or malformed fields fall back to defaults.

use serde_json::Value;

use super::segment::{split_lines, trim_space};
use super::{AnalysisResult, RawAnalysis, DEFAULT_CATEGORY, DEFAULT_URGENCY, SUMMARY_LINE_COUNT};

/// Strings accepted as an affirmative action flag (after trim + lowercase).
const AFFIRMATIVE: [&str; 3] = ["yes", "true", "y"];

/// Normalize a raw analysis into the canonical fixed-shape record.
pub fn normalize(raw: &RawAnalysis) -> AnalysisResult {
    let mut lines = summary_source(raw);
    lines.truncate(SUMMARY_LINE_COUNT);
    let filler = lines.last().cloned().unwrap_or_default();
    lines.resize(SUMMARY_LINE_COUNT, filler);

    let summary_lines = std::array::from_fn(|idx| {
        lines
            .get(idx)
            .map(|line| trim_space(line).to_owned())
            .unwrap_or_default()
    });

    let category = raw
        .category
        .clone()
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned());
    let urgency = raw
        .urgency
        .clone()
        .unwrap_or_else(|| DEFAULT_URGENCY.to_owned());

    let flag = raw.action_required.as_deref().or(raw.action.as_deref());
    let action_required = if flag.is_some_and(is_affirmative) {
        "Yes"
    } else {
        "No"
    };

    AnalysisResult {
        summary_lines,
        category,
        urgency,
        action_required: action_required.to_owned(),
    }
}

/// Whether a flag value reads as "yes".
pub fn is_affirmative(flag: &str) -> bool {
    let lowered = trim_space(flag).to_lowercase();
    AFFIRMATIVE.contains(&lowered.as_str())
}

/// Resolve the summary lines from `summary_lines`, falling back to `summary`.
fn summary_source(raw: &RawAnalysis) -> Vec<String> {
    match raw.summary_lines.as_ref().or(raw.summary.as_ref()) {
        Some(Value::Array(items)) => items.iter().map(entry_text).collect(),
        Some(Value::String(text)) => split_summary_text(text),
        _ => Vec::new(),
    }
}

/// Split a delimited summary string into lines, dropping blank lines and
/// stripping bullet decoration from both ends.
fn split_summary_text(text: &str) -> Vec<String> {
    split_lines(text)
        .filter(|line| !trim_space(line).is_empty())
        .map(|line| {
            line.trim_matches(|c: char| matches!(c, '-' | '*' | ' ' | '\t'))
                .to_owned()
        })
        .collect()
}

fn entry_text(entry: &Value) -> String {
    match entry {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
