//! Rendering of canonical results for people and downstream sinks.

use serde::{Deserialize, Serialize};

use crate::analysis::segment::collapse_whitespace;
use crate::analysis::AnalysisResult;

/// One-line human report:
/// `Summary: … Category: … Urgency: … Action: …`.
pub fn format_report_line(result: &AnalysisResult) -> String {
    let summary = collapse_whitespace(&result.joined_summary());
    format!(
        "Summary: {summary} Category: {} Urgency: {} Action: {}",
        result.category, result.urgency, result.action_required
    )
}

/// The row handed to downstream sinks, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Summary lines joined by single spaces.
    pub summary: String,
    /// Category label.
    pub category: String,
    /// Urgency label.
    pub urgency: String,
    /// `"Yes"` or `"No"`.
    pub action_required: String,
}

impl ReportRow {
    /// Build the row for a canonical result.
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            summary: result.joined_summary(),
            category: result.category.clone(),
            urgency: result.urgency.clone(),
            action_required: result.action_required.clone(),
        }
    }

    /// Column values in order.
    pub fn values(&self) -> [&str; 4] {
        [
            &self.summary,
            &self.category,
            &self.urgency,
            &self.action_required,
        ]
    }
}
