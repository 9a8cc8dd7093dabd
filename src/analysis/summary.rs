//! Summary line selection.
//!
//! Lines are chosen purely by order of appearance: the subject first, then the
//! earliest body sentences. There is no scoring.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::segment::{trim_space, Segments};

/// Leading bullets, decimal digits, `.`/`)` and blanks. `\d` is decimal digits
/// only, so fractions, superscripts and Roman numerals are kept.
static LIST_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[\-\*\d\.\)\s\x1C-\x1F]+").ok());

/// Pick up to `count` candidates: subject, then sentences, deduplicated.
///
/// The result is padded to exactly `count` by repeating the last candidate,
/// or with empty strings when there is none.
pub fn select_candidates(segments: &Segments, count: usize) -> Vec<String> {
    let candidates = std::iter::once(segments.subject.as_str())
        .chain(segments.sentences.iter().map(String::as_str))
        .filter(|line| !line.is_empty());

    let mut seen = HashSet::new();
    let mut selected: Vec<String> = candidates
        .filter(|line| seen.insert(*line))
        .take(count)
        .map(str::to_owned)
        .collect();

    let filler = selected.last().cloned().unwrap_or_default();
    selected.resize(count, filler);
    selected
}

/// Strip leading list markers (`-`, `*`, decimal digits, `.`, `)` and
/// whitespace), then surrounding whitespace.
pub fn strip_list_marker(line: &str) -> &str {
    let rest = LIST_MARKER
        .as_ref()
        .and_then(|marker| marker.find(line))
        .and_then(|found| line.get(found.end()..))
        .unwrap_or(line);
    trim_space(rest)
}

/// Clean selected lines into the final summary.
///
/// Markers are stripped, then empty lines and repeats are dropped, since
/// stripping can turn distinct lines into duplicates. The result is padded
/// with empty strings to exactly `count`.
pub fn finalize_lines(selected: &[String], count: usize) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(count);
    for line in selected.iter().map(|line| strip_list_marker(line)) {
        if line.is_empty() || cleaned.iter().any(|kept| kept == line) {
            continue;
        }
        cleaned.push(line.to_owned());
    }
    cleaned.truncate(count);
    cleaned.resize(count, String::new());
    cleaned
}

/// Select and clean exactly `count` summary lines for a segmented email.
pub fn summarize(segments: &Segments, count: usize) -> Vec<String> {
    finalize_lines(&select_candidates(segments, count), count)
}
