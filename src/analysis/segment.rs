//! Subject/body segmentation and sentence splitting.

/// An email split into its subject line and body sentences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    /// First non-empty line, whitespace-collapsed. Empty for blank input.
    pub subject: String,
    /// Body sentences in original order.
    pub sentences: Vec<String>,
}

/// Split raw email text into a subject and body sentences.
///
/// The first non-empty line is the subject; every following non-empty line
/// is joined with a single space to form the body.
pub fn segment(text: &str) -> Segments {
    let mut lines = split_lines(text)
        .map(trim_space)
        .filter(|line| !line.is_empty());

    let subject = lines.next().map(collapse_whitespace).unwrap_or_default();
    let body = lines.collect::<Vec<_>>().join(" ");

    Segments {
        subject,
        sentences: split_sentences(&body),
    }
}

/// Split text into sentences.
///
/// A boundary is a `.`, `!` or `?` followed by whitespace. Each sentence is
/// whitespace-collapsed; empty sentences are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let collapsed = collapse_whitespace(text);
    let mut sentences = Vec::new();
    let mut start = 0;

    let mut chars = collapsed.char_indices().peekable();
    while let Some((_, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        if let Some(&(next_idx, ' ')) = chars.peek() {
            push_sentence(&mut sentences, &collapsed[start..next_idx]);
            start = next_idx;
        }
    }
    push_sentence(&mut sentences, &collapsed[start..]);

    sentences
}

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split(is_space)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unicode whitespace plus the ASCII information separators `\x1c`..=`\x1f`,
/// which email text treats as blanks but `char::is_whitespace` does not.
pub fn is_space(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\u{1c}'..='\u{1f}')
}

/// Trim [`is_space`] characters from both ends.
pub fn trim_space(text: &str) -> &str {
    text.trim_matches(is_space)
}

fn push_sentence(sentences: &mut Vec<String>, piece: &str) {
    let trimmed = trim_space(piece);
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_owned());
    }
}

/// Split on every line terminator, including lone carriage returns and the
/// Unicode line/paragraph separators.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| {
        matches!(
            c,
            '\n' | '\r'
                | '\u{0b}'
                | '\u{0c}'
                | '\u{1c}'
                | '\u{1d}'
                | '\u{1e}'
                | '\u{85}'
                | '\u{2028}'
                | '\u{2029}'
        )
    })
}
