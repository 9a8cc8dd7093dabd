//! Keyword classifiers for category, urgency and action-required.
//!
//! Category and urgency use lenient substring matching on the lowercased
//! text, so `"it"` matches inside `"submit"`. Action detection uses
//! word-anchored imperative patterns instead. Both styles are kept distinct.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Email category, in classifier priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Coursework, exams, university business.
    Academic,
    /// Payroll, benefits, hiring, HR policy.
    Hr,
    /// Invoices, payments, budgets.
    Finance,
    /// Infrastructure, outages, support tickets.
    It,
    /// Anything else.
    General,
}

impl Category {
    /// Canonical label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Academic => "Academic",
            Self::Hr => "HR",
            Self::Finance => "Finance",
            Self::It => "IT",
            Self::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency level, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Urgency {
    /// Needs attention right now.
    Critical,
    /// Needs attention within a day or so.
    High,
    /// No time pressure detected.
    Normal,
}

impl Urgency {
    /// Canonical label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Normal => "Normal",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const CATEGORY_KEYWORDS: [(Category, &[&str]); 4] = [
    (
        Category::Academic,
        &[
            "professor",
            "syllabus",
            "course",
            "assignment",
            "university",
            "campus",
            "exam",
            "grade",
        ],
    ),
    (
        Category::Hr,
        &[
            "payroll",
            "benefit",
            "vacation",
            "leave",
            "hiring",
            "recruit",
            "offer letter",
            "onboarding",
            "policy",
            "hr",
        ],
    ),
    (
        Category::Finance,
        &[
            "invoice",
            "receipt",
            "payment",
            "refund",
            "expense",
            "budget",
            "billing",
            "accounting",
            "tax",
        ],
    ),
    (
        Category::It,
        &[
            "server",
            "outage",
            "deploy",
            "bug",
            "error",
            "database",
            "network",
            "vpn",
            "support ticket",
            "reset password",
            "authentication",
            "it",
        ],
    ),
];

const URGENCY_KEYWORDS: [(Urgency, &[&str]); 2] = [
    (
        Urgency::Critical,
        &[
            "urgent",
            "immediately",
            "asap",
            "today",
            "within 1 hour",
            "security incident",
            "breach",
            "deadline today",
            "production down",
        ],
    ),
    (
        Urgency::High,
        &[
            "tomorrow",
            "this week",
            "by end of day",
            "soon",
            "time-sensitive",
            "follow up",
            "reminder",
        ],
    ),
];

const REQUEST_VERBS: &str =
    "review|respond|reply|confirm|approve|sign|submit|update|schedule|complete|attend";

static ACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"(?i)\bplease\s+({REQUEST_VERBS})\b"),
        r"(?i)\baction\s+required\b".to_owned(),
        format!(r"(?i)\bkindly\s+({REQUEST_VERBS})\b"),
        r"(?i)\bfill out\b".to_owned(),
        r"(?i)\bclick\s+the\s+link\b".to_owned(),
        r"(?i)\bsend\s+us\b".to_owned(),
        r"(?i)\bprovide\s+\w+\b".to_owned(),
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Classify the email category. First matching keyword set wins.
pub fn classify_category(text: &str) -> Category {
    let lowered = text.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&lowered, keywords))
        .map_or(Category::General, |(category, _)| *category)
}

/// Classify urgency. Critical keywords are checked before high ones.
pub fn classify_urgency(text: &str) -> Urgency {
    let lowered = text.to_lowercase();
    URGENCY_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&lowered, keywords))
        .map_or(Urgency::Normal, |(urgency, _)| *urgency)
}

/// Whether the text explicitly asks the reader to act.
pub fn requires_action(text: &str) -> bool {
    ACTION_PATTERNS.iter().any(|pattern| pattern.is_match(text))
}

/// Map an action decision to its canonical `"Yes"`/`"No"` label.
pub fn action_label(required: bool) -> &'static str {
    if required {
        "Yes"
    } else {
        "No"
    }
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}
