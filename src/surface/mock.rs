//! Mock surface for engine tests
//!
//! Scripted caret state plus a log of insertion calls, so tests can
//! assert what the engine asked the surface to do without a real
//! editing model.

use super::{CaretBookmark, CaretPos, Result, Surface};

/// Mock surface returning scripted text and recording insertions
#[derive(Debug, Clone, Default)]
pub struct MockSurface {
    /// Text reported as sitting before the caret
    pub text_before_caret: String,
    /// Logical value reported to the engine
    pub value: String,
    /// Every `(bookmark, content)` pair passed to `insert_at_bookmark`
    pub insertions: Vec<(CaretBookmark, String)>,
    /// Bookmarks handed out, in order
    pub bookmarks: Vec<CaretBookmark>,
}

impl MockSurface {
    pub fn new(text_before_caret: impl Into<String>) -> Self {
        let text = text_before_caret.into();
        Self {
            value: text.clone(),
            text_before_caret: text,
            insertions: Vec::new(),
            bookmarks: Vec::new(),
        }
    }
}

impl Surface for MockSurface {
    fn text_before_caret(&self) -> Result<String> {
        Ok(self.text_before_caret.clone())
    }

    fn bookmark_caret(&mut self, token_chars: usize) -> Result<CaretBookmark> {
        let end = self.text_before_caret.chars().count();
        let bookmark = CaretBookmark::Span {
            start: end.saturating_sub(token_chars + 1),
            end,
        };
        self.bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    fn insert_at_bookmark(&mut self, bookmark: &CaretBookmark, content: &str) -> Result<()> {
        self.insertions.push((bookmark.clone(), content.to_string()));
        self.value.push_str(content);
        Ok(())
    }

    fn caret_position(&self) -> CaretPos {
        CaretPos {
            x: u16::try_from(self.text_before_caret.chars().count()).unwrap_or(u16::MAX),
            y: 0,
        }
    }

    fn value(&self) -> String {
        self.value.clone()
    }
}
