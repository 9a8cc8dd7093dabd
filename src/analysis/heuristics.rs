//! Deterministic, local analysis used when no model provider is available.

use tracing::debug;

use super::classify::{action_label, classify_category, classify_urgency, requires_action};
use super::segment::segment;
use super::summary::summarize;
use super::{RawAnalysis, SUMMARY_LINE_COUNT};

/// Analyze an email with keyword rules and positional sentence selection.
///
/// Never fails; blank input produces empty summary lines and default labels.
pub fn analyze_with_heuristics(email_text: &str) -> RawAnalysis {
    let category = classify_category(email_text);
    let urgency = classify_urgency(email_text);
    let action = requires_action(email_text);
    let summary_lines = summarize(&segment(email_text), SUMMARY_LINE_COUNT);

    debug!(
        category = %category,
        urgency = %urgency,
        action_required = action,
        "heuristic analysis complete"
    );

    RawAnalysis::from_parts(
        summary_lines,
        category.as_str(),
        urgency.as_str(),
        action_label(action),
    )
}
