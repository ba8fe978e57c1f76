//! Event handling for the demo editor
//!
//! Maps crossterm key events onto engine keys and editor actions.

use crate::engine::Key;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    /// Continue running the event loop
    Continue,
    /// Exit the editor
    Quit,
    /// No action taken
    Ignored,
}

/// What the editor should do with a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// Feed the engine and, if passed through, apply the edit
    Edit(Key),
    /// Move the caret left
    CaretLeft,
    /// Move the caret right
    CaretRight,
    /// Leave the editor
    Quit,
    /// Nothing to do
    None,
}

/// Map one key event to an editor action
#[must_use]
pub fn map_key(key: KeyEvent) -> EditorAction {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => EditorAction::Quit,
        (KeyCode::Esc, _) => EditorAction::Quit,
        (KeyCode::Up, _) => EditorAction::Edit(Key::Up),
        (KeyCode::Down, _) => EditorAction::Edit(Key::Down),
        (KeyCode::Enter, _) => EditorAction::Edit(Key::Enter),
        (KeyCode::Backspace, _) => EditorAction::Edit(Key::Backspace),
        (KeyCode::Left, _) => EditorAction::CaretLeft,
        (KeyCode::Right, _) => EditorAction::CaretRight,
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            EditorAction::Edit(Key::Char(c))
        }
        _ => EditorAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_navigation_keys() {
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE)),
            EditorAction::Edit(Key::Up)
        );
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            EditorAction::Edit(Key::Enter)
        );
    }

    #[test]
    fn test_map_text_keys() {
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
            EditorAction::Edit(Key::Char('a'))
        );
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            EditorAction::Edit(Key::Char('A'))
        );
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)),
            EditorAction::Edit(Key::Backspace)
        );
    }

    #[test]
    fn test_map_quit_keys() {
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            EditorAction::Quit
        );
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            EditorAction::Quit
        );
    }

    #[test]
    fn test_unmapped_key_is_none() {
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE)),
            EditorAction::None
        );
    }
}
