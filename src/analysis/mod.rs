//! Email analysis records and the deterministic fallback pipeline.
//!
//! Every analysis source (a model provider or the local heuristics) produces a
//! [`RawAnalysis`]. The [`normalize::normalize`] step turns any raw record into
//! the canonical [`AnalysisResult`], which always carries exactly
//! [`SUMMARY_LINE_COUNT`] summary lines.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod classify;
pub mod heuristics;
pub mod normalize;
pub mod segment;
pub mod summary;

/// Number of summary lines in every canonical result.
pub const SUMMARY_LINE_COUNT: usize = 5;

/// Closed set of category labels, in classifier priority order.
pub const CATEGORIES: [&str; 5] = ["Academic", "HR", "Finance", "IT", "General"];

/// Closed set of urgency labels, most urgent first.
pub const URGENCY_LEVELS: [&str; 3] = ["Critical", "High", "Normal"];

/// Default category when none is provided.
pub const DEFAULT_CATEGORY: &str = "General";

/// Default urgency when none is provided.
pub const DEFAULT_URGENCY: &str = "Normal";

// ---------------------------------------------------------------------------
// Canonical result
// ---------------------------------------------------------------------------

/// Canonical, fixed-shape analysis of one email.
///
/// `category` and `urgency` are passed through from the producing source.
/// The heuristic classifiers only emit members of [`CATEGORIES`] and
/// [`URGENCY_LEVELS`]; a model provider may return other strings and those
/// are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Exactly five summary lines; trailing entries may be empty or repeats.
    pub summary_lines: [String; SUMMARY_LINE_COUNT],
    /// Category label.
    pub category: String,
    /// Urgency label.
    pub urgency: String,
    /// `"Yes"` or `"No"`.
    pub action_required: String,
}

impl AnalysisResult {
    /// Whether the email asks the recipient to do something.
    pub fn requires_action(&self) -> bool {
        self.action_required == "Yes"
    }

    /// Summary lines joined with single spaces.
    pub fn joined_summary(&self) -> String {
        self.summary_lines.join(" ")
    }
}

impl From<&AnalysisResult> for RawAnalysis {
    fn from(result: &AnalysisResult) -> Self {
        RawAnalysis {
            summary_lines: Some(Value::Array(
                result
                    .summary_lines
                    .iter()
                    .map(|line| Value::String(line.clone()))
                    .collect(),
            )),
            summary: None,
            category: Some(result.category.clone()),
            urgency: Some(result.urgency.clone()),
            action_required: Some(result.action_required.clone()),
            action: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Raw, producer-agnostic analysis
// ---------------------------------------------------------------------------

/// Unvalidated analysis as produced by a model or the heuristics.
///
/// Every field is optional. A field holding a JSON-falsy value (null, `false`,
/// `0`, `""`, `[]`, `{}`) is stored as `None`, so `Some` always means the
/// producer supplied something usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawAnalysis {
    /// Summary as an array of lines or a newline/bullet-delimited string.
    pub summary_lines: Option<Value>,
    /// Alternate key for the summary, consulted when `summary_lines` is absent.
    pub summary: Option<Value>,
    /// Category label.
    pub category: Option<String>,
    /// Urgency label.
    pub urgency: Option<String>,
    /// Yes/no-like action flag.
    pub action_required: Option<String>,
    /// Alternate key for the action flag.
    pub action: Option<String>,
}

impl RawAnalysis {
    /// Build a raw record from already-typed parts.
    pub fn from_parts(
        summary_lines: Vec<String>,
        category: &str,
        urgency: &str,
        action_required: &str,
    ) -> Self {
        Self {
            summary_lines: truthy(Value::Array(
                summary_lines.into_iter().map(Value::String).collect(),
            )),
            summary: None,
            category: scalar_text(&Value::String(category.to_owned())),
            urgency: scalar_text(&Value::String(urgency.to_owned())),
            action_required: scalar_text(&Value::String(action_required.to_owned())),
            action: None,
        }
    }

    /// Convert arbitrary JSON into a raw record. Never fails.
    ///
    /// Anything other than a JSON object yields an empty record.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };
        let mut take = |key: &str| map.remove(key).and_then(truthy);

        let summary_lines = take("summary_lines");
        let summary = take("summary");
        let category = take("category").as_ref().and_then(scalar_text);
        let urgency = take("urgency").as_ref().and_then(scalar_text);
        let action_required = take("action_required").as_ref().and_then(scalar_text);
        let action = take("action").as_ref().and_then(scalar_text);

        Self {
            summary_lines,
            summary,
            category,
            urgency,
            action_required,
            action,
        }
    }
}

impl From<Value> for RawAnalysis {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// Keep a value only if it is JSON-truthy.
fn truthy(value: Value) -> Option<Value> {
    let keep = match &value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    };
    keep.then_some(value)
}

/// Render a truthy value as text; strings are taken verbatim.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::Bool(false) => None,
        other => truthy(other.clone()).map(|v| v.to_string()),
    }
}
