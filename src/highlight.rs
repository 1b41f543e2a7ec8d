use crate::session::Status;

/// How a single snippet character should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Untouched,
    Correct,
    Incorrect,
    Cursor,
}

/// Classify every character of `snippet` against what has been typed so far.
/// The result always has one entry per snippet character.
pub fn classify(snippet: &str, typed: &str, status: Status) -> Vec<CharClass> {
    let mut typed_chars = typed.chars();
    let typed_len = typed.chars().count();
    let show_cursor = status != Status::Finished;

    snippet
        .chars()
        .enumerate()
        .map(|(idx, expected)| match typed_chars.next() {
            Some(actual) if actual == expected => CharClass::Correct,
            Some(_) => CharClass::Incorrect,
            None if show_cursor && idx == typed_len => CharClass::Cursor,
            None => CharClass::Untouched,
        })
        .collect()
}
