//! Subject/body segmentation tests.

use mailtriage::analysis::segment::{collapse_whitespace, segment, split_sentences};

#[test]
fn first_non_empty_line_is_subject() {
    let segments = segment("\n\n  Budget review  \nThe numbers are in. Please look.");
    assert_eq!(segments.subject, "Budget review");
    assert_eq!(
        segments.sentences,
        vec!["The numbers are in.", "Please look."]
    );
}

#[test]
fn body_lines_are_joined_before_splitting() {
    let segments = segment("Subject\nThe server\nis down. We are\non it!");
    assert_eq!(segments.sentences, vec!["The server is down.", "We are on it!"]);
}

#[test]
fn subject_whitespace_is_collapsed() {
    let segments = segment("Quarterly \t  update");
    assert_eq!(segments.subject, "Quarterly update");
    assert!(segments.sentences.is_empty());
}

#[test]
fn empty_input_yields_empty_segments() {
    let segments = segment("");
    assert!(segments.subject.is_empty());
    assert!(segments.sentences.is_empty());

    let blank = segment("   \n\t\n  ");
    assert!(blank.subject.is_empty());
    assert!(blank.sentences.is_empty());
}

#[test]
fn sentence_break_requires_following_whitespace() {
    assert_eq!(
        split_sentences("Version 2.0 shipped. Great!Really? Yes."),
        vec!["Version 2.0 shipped.", "Great!Really?", "Yes."]
    );
}

#[test]
fn whitespace_runs_count_as_one_delimiter() {
    assert_eq!(
        split_sentences("One.   \n  Two!\t\tThree?"),
        vec!["One.", "Two!", "Three?"]
    );
}

#[test]
fn trailing_text_without_punctuation_is_a_sentence() {
    assert_eq!(split_sentences("Done. and then"), vec!["Done.", "and then"]);
}

#[test]
fn collapse_whitespace_trims_and_squeezes() {
    assert_eq!(collapse_whitespace("  a \n\n b\tc  "), "a b c");
}

#[test]
fn information_separators_collapse_like_whitespace() {
    assert_eq!(collapse_whitespace("A\u{1f}B"), "A B");
    let segments = segment("Sub\u{1f}ject\nOne.\u{1f}Two.");
    assert_eq!(segments.subject, "Sub ject");
    assert_eq!(segments.sentences, vec!["One.", "Two."]);
}

#[test]
fn lone_carriage_return_separates_lines() {
    let segments = segment("Subject\rFirst line. Second line.");
    assert_eq!(segments.subject, "Subject");
    assert_eq!(segments.sentences, vec!["First line.", "Second line."]);
}
