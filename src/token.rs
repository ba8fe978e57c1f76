//! Query token extraction
//!
//! The live query is the substring between the most recent trigger
//! delimiter before the caret and the caret itself. Parsing is pure and
//! byte-oriented so multi-byte text never panics.

/// Extract the live query token from the text before the caret.
///
/// Returns the substring strictly after the **last** occurrence of
/// `delimiter`, or `None` when the delimiter is absent. A later delimiter
/// always restarts the token: `"@a@b"` yields `"b"`, discarding the first
/// attempt. There is no escaping.
#[must_use]
pub fn parse_before_caret(text: &str, delimiter: char) -> Option<&str> {
    text.rfind(delimiter)
        .map(|idx| &text[idx + delimiter.len_utf8()..])
}
