//! Hosted rich-text surface (third-party editor plugin)
//!
//! The document here is owned by an external rich-text editor; the
//! adapter only talks to it through the [`PluginHost`] seam: selection
//! text, bookmark tokens that survive a full keyup cycle, and two
//! insertion primitives. Whether a chosen mention lands as an atomic
//! button-like node or as plain text is configurable, because not every
//! host document supports custom nodes.
//!
//! [`EmbeddedDocument`] is the in-memory reference host used by tests.

use super::{caret_pos_in, CaretBookmark, CaretPos, Result, Surface, SurfaceError};
use crate::config::InsertMode;
use std::collections::HashMap;

/// Seam implemented by the embedding rich-text document
pub trait PluginHost {
    /// Text from the start of the caret's text segment up to the caret
    fn text_before_caret(&self) -> String;

    /// Type a string at the caret, the host's input seam
    fn type_str(&mut self, s: &str);

    /// Save a bookmark covering the `span_chars` characters right before
    /// the caret. The returned token must stay valid across keyup cycles
    /// until replaced or consumed.
    fn save_bookmark(&mut self, span_chars: usize) -> u64;

    /// Replace the bookmarked span with `content`, collapsing the caret
    /// after the insertion
    ///
    /// # Errors
    ///
    /// Returns a `SurfaceError` when the token is unknown or the
    /// bookmarked segment no longer exists.
    fn replace_bookmark(&mut self, token: u64, content: &str, mode: InsertMode) -> Result<()>;

    /// Caret position inside the host viewport
    fn caret_position(&self) -> CaretPos;

    /// The host document's full content
    fn content(&self) -> String;
}

/// Adapter wiring the engine to a plugin host.
///
/// Registration is owned by the instance and idempotent: the first
/// `register` call wires the adapter into the host's event cycle, later
/// calls are no-ops. There is no process-global plugin state.
pub struct HostedSurface {
    host: Box<dyn PluginHost>,
    insert_mode: InsertMode,
    registered: bool,
}

impl HostedSurface {
    /// Wrap a host document; `register` must be called before events flow
    pub fn new(host: Box<dyn PluginHost>, insert_mode: InsertMode) -> Self {
        Self {
            host,
            insert_mode,
            registered: false,
        }
    }

    /// Idempotent registration guard. Returns true on the first call,
    /// false when the adapter was already registered.
    pub fn register(&mut self) -> bool {
        if self.registered {
            return false;
        }
        self.registered = true;
        true
    }

    #[must_use]
    pub const fn is_registered(&self) -> bool {
        self.registered
    }

    #[must_use]
    pub const fn insert_mode(&self) -> InsertMode {
        self.insert_mode
    }

    pub fn set_insert_mode(&mut self, mode: InsertMode) {
        self.insert_mode = mode;
    }

    /// Access the host document, e.g. to feed it input in a demo
    pub fn host_mut(&mut self) -> &mut dyn PluginHost {
        self.host.as_mut()
    }
}

impl Surface for HostedSurface {
    fn text_before_caret(&self) -> Result<String> {
        Ok(self.host.text_before_caret())
    }

    fn bookmark_caret(&mut self, token_chars: usize) -> Result<CaretBookmark> {
        // Span covers the delimiter plus the token.
        let token = self.host.save_bookmark(token_chars + 1);
        Ok(CaretBookmark::Token(token))
    }

    fn insert_at_bookmark(&mut self, bookmark: &CaretBookmark, content: &str) -> Result<()> {
        let CaretBookmark::Token(token) = *bookmark else {
            return Err(SurfaceError::BookmarkKind);
        };
        self.host.replace_bookmark(token, content, self.insert_mode)
    }

    fn caret_position(&self) -> CaretPos {
        self.host.caret_position()
    }

    fn value(&self) -> String {
        self.host.content()
    }
}

/// One segment of the embedded reference document
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    /// An atomic node; opaque to editing, rendered verbatim in content
    Atomic(String),
}

/// In-memory reference implementation of [`PluginHost`].
///
/// Keeps the caret inside a text segment and hands out numbered bookmark
/// tokens for spans of that segment.
#[derive(Debug)]
pub struct EmbeddedDocument {
    segments: Vec<Segment>,
    caret_segment: usize,
    /// Character offset within the caret's text segment
    caret_offset: usize,
    bookmarks: HashMap<u64, (usize, usize, usize)>,
    next_token: u64,
}

impl Default for EmbeddedDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddedDocument {
    #[must_use]
    pub fn new() -> Self {
        Self {
            segments: vec![Segment::Text(String::new())],
            caret_segment: 0,
            caret_offset: 0,
            bookmarks: HashMap::new(),
            next_token: 1,
        }
    }
}

fn byte_of(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(i, _)| i)
}

impl PluginHost for EmbeddedDocument {
    fn text_before_caret(&self) -> String {
        match self.segments.get(self.caret_segment) {
            Some(Segment::Text(text)) => {
                let byte = byte_of(text, self.caret_offset);
                text[..byte].to_string()
            }
            _ => String::new(),
        }
    }

    fn type_str(&mut self, s: &str) {
        if let Some(Segment::Text(text)) = self.segments.get_mut(self.caret_segment) {
            let byte = byte_of(text, self.caret_offset);
            text.insert_str(byte, s);
            self.caret_offset += s.chars().count();
        }
    }

    fn save_bookmark(&mut self, span_chars: usize) -> u64 {
        // The engine re-bookmarks on every detection; only the newest
        // token is ever consumed, so older ones are dropped here.
        self.bookmarks.clear();
        let token = self.next_token;
        self.next_token += 1;
        self.bookmarks.insert(
            token,
            (
                self.caret_segment,
                self.caret_offset.saturating_sub(span_chars),
                self.caret_offset,
            ),
        );
        token
    }

    fn replace_bookmark(&mut self, token: u64, content: &str, mode: InsertMode) -> Result<()> {
        let (segment, start, end) = self
            .bookmarks
            .remove(&token)
            .ok_or(SurfaceError::UnknownToken(token))?;
        let Some(Segment::Text(text)) = self.segments.get(segment) else {
            return Err(SurfaceError::StaleNode(segment));
        };
        if start > end || end > text.chars().count() {
            return Err(SurfaceError::StaleSpan { start, end });
        }
        let byte_start = byte_of(text, start);
        let byte_end = byte_of(text, end);
        let prefix = text[..byte_start].to_string();
        let suffix = text[byte_end..].to_string();
        match mode {
            InsertMode::AtomicNode => {
                self.segments.splice(
                    segment..=segment,
                    [
                        Segment::Text(prefix),
                        Segment::Atomic(content.to_string()),
                        Segment::Text(suffix),
                    ],
                );
                self.caret_segment = segment + 2;
                self.caret_offset = 0;
            }
            InsertMode::PlainText => {
                let offset = start + content.chars().count();
                self.segments
                    .splice(segment..=segment, [Segment::Text(format!("{prefix}{content}{suffix}"))]);
                self.caret_segment = segment;
                self.caret_offset = offset;
            }
        }
        Ok(())
    }

    fn caret_position(&self) -> CaretPos {
        let mut before = String::new();
        for segment in &self.segments[..self.caret_segment] {
            match segment {
                Segment::Text(t) | Segment::Atomic(t) => before.push_str(t),
            }
        }
        if let Some(Segment::Text(text)) = self.segments.get(self.caret_segment) {
            let byte = byte_of(text, self.caret_offset);
            before.push_str(&text[..byte]);
        }
        caret_pos_in(&before)
    }

    fn content(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(t) | Segment::Atomic(t) => t.clone(),
            })
            .collect()
    }
}
