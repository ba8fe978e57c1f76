//! Node-tree surface (contenteditable style)
//!
//! The document is a flat list of child nodes: text runs, atomic mention
//! nodes and line breaks. The logical value is derived by walking the
//! children: text contributes verbatim, a mention node contributes its
//! content wrapped in padding spaces, a line break contributes `\n`.
//!
//! The caret always sits inside a text node (child index plus character
//! offset); insertion keeps that invariant by surrounding every mention
//! and break with text nodes, empty when necessary. When the derived value
//! exceeds the length cap the content is forced down to exactly the cap
//! and the surface blurs itself, blocking further input until the host
//! reduces content. That is an intentional UX choice, not a bug.

use super::{caret_pos_in, CaretBookmark, CaretPos, Result, Surface, SurfaceError};

/// One child of the node-tree document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A plain text run
    Text(String),
    /// An atomic mention token rendering the given content
    Mention(String),
    /// A hard line break
    LineBreak,
}

impl Node {
    fn plain_text(&self) -> String {
        match self {
            Self::Text(t) => t.clone(),
            Self::Mention(v) => format!(" {v} "),
            Self::LineBreak => "\n".to_string(),
        }
    }
}

/// Rich-text surface over a child-node list, caret as node index + offset
#[derive(Debug, Clone)]
pub struct NodeSurface {
    children: Vec<Node>,
    caret_node: usize,
    /// Character offset within the caret's text node
    caret_offset: usize,
    focused: bool,
}

impl Default for NodeSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeSurface {
    /// Create an empty, focused surface
    #[must_use]
    pub fn new() -> Self {
        Self {
            children: vec![Node::Text(String::new())],
            caret_node: 0,
            caret_offset: 0,
            focused: true,
        }
    }

    /// The document's children
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Type one character at the caret. Input on a blurred surface is
    /// discarded; returns whether the character was accepted.
    pub fn type_char(&mut self, c: char) -> bool {
        if !self.focused {
            return false;
        }
        let offset = self.caret_offset;
        if let Some(Node::Text(text)) = self.children.get_mut(self.caret_node) {
            let byte = byte_of(text, offset);
            text.insert(byte, c);
            self.caret_offset += 1;
            true
        } else {
            false
        }
    }

    /// Delete backwards: a character within the caret's text node, or the
    /// whole preceding mention/break node when the caret sits at offset 0
    pub fn backspace(&mut self) {
        if !self.focused {
            return;
        }
        if self.caret_offset > 0 {
            if let Some(Node::Text(text)) = self.children.get_mut(self.caret_node) {
                let start = byte_of(text, self.caret_offset - 1);
                let end = byte_of(text, self.caret_offset);
                text.drain(start..end);
                self.caret_offset -= 1;
            }
            return;
        }
        if self.caret_node == 0 {
            return;
        }
        // Remove the node before the caret's text node and merge with any
        // text node in front of it.
        self.children.remove(self.caret_node - 1);
        self.caret_node -= 1;
        if self.caret_node == 0 {
            return;
        }
        let merged = match &self.children[self.caret_node - 1..=self.caret_node] {
            [Node::Text(prev), Node::Text(cur)] => {
                Some((format!("{prev}{cur}"), prev.chars().count()))
            }
            _ => None,
        };
        if let Some((text, offset)) = merged {
            self.children
                .splice(self.caret_node - 1..=self.caret_node, [Node::Text(text)]);
            self.caret_node -= 1;
            self.caret_offset = offset;
        }
    }

    /// Insert a hard line break at the caret, splitting the text node
    pub fn insert_line_break(&mut self) -> bool {
        if !self.focused {
            return false;
        }
        let offset = self.caret_offset;
        let Some(Node::Text(text)) = self.children.get(self.caret_node) else {
            return false;
        };
        let byte = byte_of(text, offset);
        let prefix = text[..byte].to_string();
        let suffix = text[byte..].to_string();
        self.children.splice(
            self.caret_node..=self.caret_node,
            [Node::Text(prefix), Node::LineBreak, Node::Text(suffix)],
        );
        self.caret_node += 2;
        self.caret_offset = 0;
        true
    }

    /// Derived plain text up to (not including) the caret
    fn derived_before_caret(&self) -> String {
        let mut out = String::new();
        for node in &self.children[..self.caret_node] {
            out.push_str(&node.plain_text());
        }
        if let Some(Node::Text(text)) = self.children.get(self.caret_node) {
            let byte = byte_of(text, self.caret_offset);
            out.push_str(&text[..byte]);
        }
        out
    }
}

fn byte_of(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(i, _)| i)
}

impl Surface for NodeSurface {
    fn text_before_caret(&self) -> Result<String> {
        // Matching happens only against the caret's own text run, so a
        // trigger never spans across mention or break nodes.
        match self.children.get(self.caret_node) {
            Some(Node::Text(text)) => {
                let byte = byte_of(text, self.caret_offset);
                Ok(text[..byte].to_string())
            }
            _ => Ok(String::new()),
        }
    }

    fn bookmark_caret(&mut self, token_chars: usize) -> Result<CaretBookmark> {
        Ok(CaretBookmark::Node {
            node: self.caret_node,
            start: self.caret_offset.saturating_sub(token_chars + 1),
            end: self.caret_offset,
        })
    }

    fn insert_at_bookmark(&mut self, bookmark: &CaretBookmark, content: &str) -> Result<()> {
        let CaretBookmark::Node { node, start, end } = *bookmark else {
            return Err(SurfaceError::BookmarkKind);
        };
        let Some(Node::Text(text)) = self.children.get(node) else {
            return Err(SurfaceError::StaleNode(node));
        };
        if start > end || end > text.chars().count() {
            return Err(SurfaceError::StaleSpan { start, end });
        }
        let byte_start = byte_of(text, start);
        let byte_end = byte_of(text, end);
        let prefix = text[..byte_start].to_string();
        let suffix = text[byte_end..].to_string();
        self.children.splice(
            node..=node,
            [
                Node::Text(prefix),
                Node::Mention(content.to_string()),
                Node::Text(suffix),
            ],
        );
        self.caret_node = node + 2;
        self.caret_offset = 0;
        Ok(())
    }

    fn caret_position(&self) -> CaretPos {
        caret_pos_in(&self.derived_before_caret())
    }

    fn value(&self) -> String {
        self.children.iter().map(Node::plain_text).collect()
    }

    fn enforce_max_length(&mut self, max: usize) -> bool {
        let derived = self.value();
        if derived.chars().count() <= max {
            return false;
        }
        let truncated: String = derived.chars().take(max).collect();
        let end = truncated.chars().count();
        self.children = vec![Node::Text(truncated)];
        self.caret_node = 0;
        self.caret_offset = end;
        self.blur();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(surface: &mut NodeSurface, s: &str) {
        for c in s.chars() {
            surface.type_char(c);
        }
    }

    #[test]
    fn test_value_translates_nodes() {
        let mut surface = NodeSurface::new();
        type_str(&mut surface, "hi @al");
        let bookmark = CaretBookmark::Node {
            node: 0,
            start: 3,
            end: 6,
        };
        surface.insert_at_bookmark(&bookmark, "@alice").unwrap();
        surface.insert_line_break();
        type_str(&mut surface, "bye");
        assert_eq!(surface.value(), "hi  @alice \nbye");
    }

    #[test]
    fn test_text_before_caret_is_current_text_run_only() {
        let mut surface = NodeSurface::new();
        type_str(&mut surface, "hi @al");
        let bookmark = surface.bookmark_caret(2).unwrap();
        surface.insert_at_bookmark(&bookmark, "@alice").unwrap();
        type_str(&mut surface, " and @bo");
        // The mention node does not leak into the matched text.
        assert_eq!(surface.text_before_caret().unwrap(), " and @bo");
    }

    #[test]
    fn test_bookmark_then_insert() {
        let mut surface = NodeSurface::new();
        type_str(&mut surface, "hi @al");
        let bookmark = surface.bookmark_caret(2).unwrap();
        assert_eq!(
            bookmark,
            CaretBookmark::Node {
                node: 0,
                start: 3,
                end: 6
            }
        );
        surface.insert_at_bookmark(&bookmark, "@alice").unwrap();
        assert_eq!(
            surface.children(),
            &[
                Node::Text("hi ".into()),
                Node::Mention("@alice".into()),
                Node::Text(String::new()),
            ]
        );
        // Caret lands right after the mention, in the trailing text node.
        assert!(surface.type_char('!'));
        assert_eq!(surface.value(), "hi  @alice !");
    }

    #[test]
    fn test_bookmark_survives_later_detection_gap() {
        let mut surface = NodeSurface::new();
        type_str(&mut surface, "hey @bob");
        let bookmark = surface.bookmark_caret(3).unwrap();
        // Nothing changes during the debounce gap; the bookmark still
        // resolves against the same text node.
        surface.insert_at_bookmark(&bookmark, "@bobby").unwrap();
        assert_eq!(surface.value(), "hey  @bobby ");
    }

    #[test]
    fn test_insert_rejects_stale_node() {
        let mut surface = NodeSurface::new();
        let bookmark = CaretBookmark::Node {
            node: 5,
            start: 0,
            end: 0,
        };
        assert_eq!(
            surface.insert_at_bookmark(&bookmark, "x"),
            Err(SurfaceError::StaleNode(5))
        );
    }

    #[test]
    fn test_backspace_removes_preceding_mention_node() {
        let mut surface = NodeSurface::new();
        type_str(&mut surface, "hi @al");
        let bookmark = surface.bookmark_caret(2).unwrap();
        surface.insert_at_bookmark(&bookmark, "@alice").unwrap();
        surface.backspace();
        assert_eq!(surface.value(), "hi ");
        // Merged back into a single text node; typing continues inline.
        assert!(surface.type_char('x'));
        assert_eq!(surface.value(), "hi x");
    }

    #[test]
    fn test_enforce_max_length_truncates_and_blurs() {
        let mut surface = NodeSurface::new();
        type_str(&mut surface, "0123456789abc");
        assert!(surface.enforce_max_length(10));
        assert_eq!(surface.value(), "0123456789");
        assert!(!surface.is_focused());
        // Blurred surface blocks further input.
        assert!(!surface.type_char('z'));
        assert_eq!(surface.value(), "0123456789");
        surface.focus();
        assert!(surface.type_char('z'));
    }

    #[test]
    fn test_enforce_max_length_noop_under_cap() {
        let mut surface = NodeSurface::new();
        type_str(&mut surface, "short");
        assert!(!surface.enforce_max_length(10));
        assert!(surface.is_focused());
    }

    #[test]
    fn test_line_break_splits_text_node() {
        let mut surface = NodeSurface::new();
        type_str(&mut surface, "ab");
        surface.insert_line_break();
        type_str(&mut surface, "cd");
        assert_eq!(surface.value(), "ab\ncd");
        assert_eq!(surface.caret_position(), CaretPos { x: 2, y: 1 });
    }
}
