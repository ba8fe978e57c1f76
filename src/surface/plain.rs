//! Plain text surface (textarea / single-line input)
//!
//! The value is the native string; the caret is a pair of character
//! offsets (selection start and end, equal while collapsed). Insertion
//! splices the string at the bookmarked offsets and leaves the scroll
//! offset untouched. A length cap rejects typed input once the value is
//! at the limit, the way a native `maxLength` attribute does.

use super::{caret_pos_in, CaretBookmark, CaretPos, Result, Surface, SurfaceError};
use regex::Regex;
use std::sync::LazyLock;

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\r\n|\r").expect("static pattern"));

/// Textarea-like surface with a character-offset caret model
#[derive(Debug, Clone, Default)]
pub struct PlainSurface {
    value: String,
    /// Selection start, in characters
    sel_start: usize,
    /// Selection end; equal to `sel_start` while the selection is collapsed
    sel_end: usize,
    /// First visible line, preserved across insertions
    scroll_top: usize,
    max_length: Option<usize>,
}

impl PlainSurface {
    /// Create an empty surface
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface with initial content, caret at the end
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let end = value.chars().count();
        Self {
            value,
            sel_start: end,
            sel_end: end,
            scroll_top: 0,
            max_length: None,
        }
    }

    /// Cap the value length; `None` disables
    pub fn set_max_length(&mut self, max_length: Option<usize>) {
        self.max_length = max_length;
    }

    /// Caret offset in characters (the selection end)
    #[must_use]
    pub const fn caret(&self) -> usize {
        self.sel_end
    }

    /// First visible line
    #[must_use]
    pub const fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn set_scroll_top(&mut self, scroll_top: usize) {
        self.scroll_top = scroll_top;
    }

    /// Place a (possibly non-collapsed) selection
    pub fn select(&mut self, start: usize, end: usize) {
        let count = self.char_count();
        self.sel_start = start.min(count);
        self.sel_end = end.min(count).max(self.sel_start);
    }

    /// Type one character at the caret, replacing any selection.
    /// Returns false when the length cap rejects the input.
    pub fn type_char(&mut self, c: char) -> bool {
        if let Some(max) = self.max_length {
            let after_delete = self.char_count() - (self.sel_end - self.sel_start);
            if after_delete >= max {
                return false;
            }
        }
        self.delete_selection();
        let byte = self.byte_of(self.sel_start);
        self.value.insert(byte, c);
        self.sel_start += 1;
        self.sel_end = self.sel_start;
        true
    }

    /// Insert a line break at the caret
    pub fn type_newline(&mut self) -> bool {
        self.type_char('\n')
    }

    /// Delete the character before the caret, or the selection contents
    pub fn backspace(&mut self) {
        if self.sel_start != self.sel_end {
            self.delete_selection();
            return;
        }
        if self.sel_start == 0 {
            return;
        }
        let start = self.byte_of(self.sel_start - 1);
        let end = self.byte_of(self.sel_start);
        self.value.drain(start..end);
        self.sel_start -= 1;
        self.sel_end = self.sel_start;
    }

    /// Move the caret one character left, collapsing any selection
    pub fn caret_left(&mut self) {
        self.sel_start = self.sel_start.saturating_sub(1);
        self.sel_end = self.sel_start;
    }

    /// Move the caret one character right, collapsing any selection
    pub fn caret_right(&mut self) {
        self.sel_end = (self.sel_end + 1).min(self.char_count());
        self.sel_start = self.sel_end;
    }

    fn delete_selection(&mut self) {
        if self.sel_start != self.sel_end {
            let start = self.byte_of(self.sel_start);
            let end = self.byte_of(self.sel_end);
            self.value.drain(start..end);
            self.sel_end = self.sel_start;
        }
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    /// Byte index of the given character offset
    fn byte_of(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Value up to the caret with line breaks normalized. The caret
    /// offset counts characters of the raw value, so the slice is taken
    /// before normalization collapses any `\r\n` pair.
    fn normalized_before_caret(&self) -> String {
        let before: String = self.value.chars().take(self.sel_end).collect();
        LINE_BREAKS.replace_all(&before, "\n").into_owned()
    }
}

impl Surface for PlainSurface {
    fn text_before_caret(&self) -> Result<String> {
        Ok(self.normalized_before_caret())
    }

    fn bookmark_caret(&mut self, token_chars: usize) -> Result<CaretBookmark> {
        // The span runs from the delimiter in front of the token through
        // the selection end, so insertion replaces "@token" wholesale.
        let start = self.sel_start.saturating_sub(token_chars + 1);
        Ok(CaretBookmark::Span {
            start,
            end: self.sel_end,
        })
    }

    fn insert_at_bookmark(&mut self, bookmark: &CaretBookmark, content: &str) -> Result<()> {
        let CaretBookmark::Span { start, end } = *bookmark else {
            return Err(SurfaceError::BookmarkKind);
        };
        if start > end || end > self.char_count() {
            return Err(SurfaceError::StaleSpan { start, end });
        }
        let byte_start = self.byte_of(start);
        let byte_end = self.byte_of(end);
        self.value.replace_range(byte_start..byte_end, content);
        self.sel_start = start + content.chars().count();
        self.sel_end = self.sel_start;
        Ok(())
    }

    fn caret_position(&self) -> CaretPos {
        caret_pos_in(&self.normalized_before_caret())
    }

    fn value(&self) -> String {
        self.value.clone()
    }
}
