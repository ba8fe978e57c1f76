//! Suggestion panel state machine
//!
//! The panel is visible exactly while the candidate list is nonempty.
//! The highlight resets to the top entry whenever the panel newly
//! appears; while it stays visible a replacement list keeps the highlight
//! but clamps it to the new length. Navigation wraps at both ends.

use crate::Candidate;

/// Visible candidate list plus the keyboard-driven highlight cursor
#[derive(Debug, Default)]
pub struct PanelState {
    candidates: Vec<Candidate>,
    highlighted: usize,
    visible: bool,
}

impl PanelState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub const fn highlighted(&self) -> usize {
        self.highlighted
    }

    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    #[must_use]
    pub fn candidate(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// The highlighted candidate, if any
    #[must_use]
    pub fn selected(&self) -> Option<&Candidate> {
        if self.visible {
            self.candidates.get(self.highlighted)
        } else {
            None
        }
    }

    /// Replace the candidate list wholesale. An empty list hides the
    /// panel; a nonempty list shows it, resetting the highlight only on
    /// the hidden-to-visible edge.
    pub fn publish(&mut self, candidates: Vec<Candidate>) {
        if candidates.is_empty() {
            self.clear();
            return;
        }
        let newly_visible = !self.visible;
        self.candidates = candidates;
        self.visible = true;
        if newly_visible {
            self.highlighted = 0;
        } else if self.highlighted >= self.candidates.len() {
            self.highlighted = self.candidates.len() - 1;
        }
    }

    /// Hide the panel and drop the candidates
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.highlighted = 0;
        self.visible = false;
    }

    /// Move the highlight up, wrapping to the bottom
    pub fn highlight_prev(&mut self) {
        if !self.visible || self.candidates.is_empty() {
            return;
        }
        self.highlighted = if self.highlighted == 0 {
            self.candidates.len() - 1
        } else {
            self.highlighted - 1
        };
    }

    /// Move the highlight down, wrapping to the top
    pub fn highlight_next(&mut self) {
        if !self.visible || self.candidates.is_empty() {
            return;
        }
        self.highlighted = if self.highlighted == self.candidates.len() - 1 {
            0
        } else {
            self.highlighted + 1
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidates(names: &[&str]) -> Vec<Candidate> {
        names
            .iter()
            .map(|n| Candidate::new((*n).to_string(), json!(n)))
            .collect()
    }

    #[test]
    fn test_visible_iff_nonempty() {
        let mut panel = PanelState::new();
        assert!(!panel.is_visible());

        panel.publish(candidates(&["a", "b"]));
        assert!(panel.is_visible());

        panel.publish(Vec::new());
        assert!(!panel.is_visible());
        assert!(panel.candidates().is_empty());
    }

    #[test]
    fn test_highlight_resets_on_newly_visible() {
        let mut panel = PanelState::new();
        panel.publish(candidates(&["a", "b", "c"]));
        panel.highlight_next();
        panel.highlight_next();
        assert_eq!(panel.highlighted(), 2);

        panel.clear();
        panel.publish(candidates(&["a", "b", "c"]));
        assert_eq!(panel.highlighted(), 0);
    }

    #[test]
    fn test_intra_visible_update_preserves_highlight() {
        let mut panel = PanelState::new();
        panel.publish(candidates(&["a", "b", "c"]));
        panel.highlight_next();
        panel.publish(candidates(&["d", "e", "f"]));
        assert_eq!(panel.highlighted(), 1);
    }

    #[test]
    fn test_shrinking_list_clamps_highlight() {
        let mut panel = PanelState::new();
        panel.publish(candidates(&["a", "b", "c", "d"]));
        panel.highlight_prev();
        assert_eq!(panel.highlighted(), 3);

        panel.publish(candidates(&["a", "b"]));
        assert_eq!(panel.highlighted(), 1);
    }

    #[test]
    fn test_wrap_around_navigation() {
        let mut panel = PanelState::new();
        panel.publish(candidates(&["a", "b", "c", "d"]));

        assert_eq!(panel.highlighted(), 0);
        panel.highlight_prev();
        assert_eq!(panel.highlighted(), 3);
        panel.highlight_next();
        assert_eq!(panel.highlighted(), 0);
        panel.highlight_next();
        assert_eq!(panel.highlighted(), 1);
    }

    #[test]
    fn test_selected_candidate() {
        let mut panel = PanelState::new();
        assert!(panel.selected().is_none());

        panel.publish(candidates(&["aaaaa", "aabbb", "aaccc", "bbbcc"]));
        panel.highlight_next();
        assert_eq!(panel.selected().map(|c| c.text.as_str()), Some("aabbb"));
    }

    #[test]
    fn test_navigation_when_hidden_is_noop() {
        let mut panel = PanelState::new();
        panel.highlight_next();
        panel.highlight_prev();
        assert_eq!(panel.highlighted(), 0);
        assert!(!panel.is_visible());
    }
}
