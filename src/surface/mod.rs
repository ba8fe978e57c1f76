//! Surface adapters
//!
//! A surface is a concrete editable text host: a flat textarea-style
//! buffer, a node-tree rich editor, or an externally hosted rich-text
//! document. Each adapter implements the caret locator capability set the
//! engine drives: text before the caret, caret bookmarks, bookmark-anchored
//! insertion, caret placement, and the surface's logical plain value.
//!
//! Bookmarks are the critical piece: a live query is detected mid-keystroke
//! but the chosen mention arrives only after the debounce and data-source
//! round trip, so each surface captures "where the trigger started" in its
//! own coordinate system and must honor that capture later.

mod error;

pub mod hosted;
pub mod node;
pub mod plain;

#[cfg(test)]
pub mod mock;

pub use error::{Result, SurfaceError};
pub use hosted::{EmbeddedDocument, HostedSurface, PluginHost};
pub use node::{Node, NodeSurface};
pub use plain::PlainSurface;

/// Caret position in surface cells, used to anchor the suggestion panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaretPos {
    pub x: u16,
    pub y: u16,
}

/// A surface-specific saved insertion point.
///
/// Captured when a live query is first detected, consumed when the chosen
/// mention is inserted. Each surface understands only its own variant;
/// handing a bookmark to a different surface kind is a
/// [`SurfaceError::BookmarkKind`] misuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaretBookmark {
    /// Character-offset span within a flat string value
    Span { start: usize, end: usize },
    /// Child node index plus character offsets within that text node
    Node { node: usize, start: usize, end: usize },
    /// Plugin-native bookmark token
    Token(u64),
}

/// Caret locator and insertion primitive of one editable text host
pub trait Surface {
    /// Text from the start of the caret's containing segment up to the
    /// caret, with line breaks normalized to `\n`
    fn text_before_caret(&self) -> Result<String>;

    /// Remember the span covering the trigger delimiter plus the live
    /// token of `token_chars` characters sitting right before the caret
    fn bookmark_caret(&mut self, token_chars: usize) -> Result<CaretBookmark>;

    /// Replace the bookmarked span with `content`, deleting any originally
    /// selected range first. The caret ends up immediately after the
    /// inserted content.
    fn insert_at_bookmark(&mut self, bookmark: &CaretBookmark, content: &str) -> Result<()>;

    /// Caret position for panel placement
    fn caret_position(&self) -> CaretPos;

    /// The surface's current logical plain value
    fn value(&self) -> String;

    /// Truncate the surface content to `max` characters of logical value.
    /// Returns true when content was dropped. The default assumes the
    /// surface enforces its own cap at input time.
    fn enforce_max_length(&mut self, _max: usize) -> bool {
        false
    }
}

/// Line/column of the caret within a flat value, as a panel anchor.
/// The panel hangs one row below the caret's line.
pub(crate) fn caret_pos_in(value_before_caret: &str) -> CaretPos {
    let line = value_before_caret.matches('\n').count();
    let col = value_before_caret
        .rsplit('\n')
        .next()
        .map_or(0, |last| last.chars().count());
    CaretPos {
        x: u16::try_from(col).unwrap_or(u16::MAX),
        y: u16::try_from(line).unwrap_or(u16::MAX),
    }
}
