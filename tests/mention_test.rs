//! Integration tests for the mention engine
//!
//! These tests drive the public API end to end: keystrokes flow through
//! the engine, the debounce fires on a pumped tick, and selections land
//! on real surface adapters.

use mentionr::config::{InsertMode, MentionOptions};
use mentionr::engine::{Key, KeyDisposition, Mention};
use mentionr::surface::{
    EmbeddedDocument, HostedSurface, Node, NodeSurface, PlainSurface, Surface,
};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

const DELAY: Duration = Duration::from_millis(100);

/// Let the pending debounce fire and apply any delivery
fn settle(engine: &mut Mention, now: Instant) -> Instant {
    let now = now + DELAY + Duration::from_millis(1);
    engine.pump(now);
    now
}

/// Type a string through a plain surface and the engine
fn type_plain(
    engine: &mut Mention,
    surface: &mut PlainSurface,
    text: &str,
    mut now: Instant,
) -> Instant {
    for c in text.chars() {
        surface.type_char(c);
        now += Duration::from_millis(10);
        engine.key_up(surface, Key::Char(c), now).unwrap();
    }
    now
}

#[test]
fn test_keystroke_to_insertion_cycle() {
    let options = MentionOptions::new().with_source(vec!["aaaaa", "aabbb", "aaccc", "bbbcc"]);
    let mut engine = Mention::new(options).unwrap();
    let mut surface = PlainSurface::new();

    let now = type_plain(&mut engine, &mut surface, "hi @aa", Instant::now());
    assert!(!engine.panel().is_visible());
    let now = settle(&mut engine, now);

    assert!(engine.panel().is_visible());
    assert_eq!(engine.panel_rows(), vec!["aaaaa", "aabbb", "aaccc"]);
    assert_eq!(engine.panel().highlighted(), 0);

    engine.key_up(&mut surface, Key::Down, now).unwrap();
    assert_eq!(engine.panel().highlighted(), 1);

    let disposition = engine.key_up(&mut surface, Key::Enter, now).unwrap();
    assert_eq!(disposition, KeyDisposition::Consumed);
    assert_eq!(surface.value(), "hi @aabbb");
    assert!(!engine.panel().is_visible());
    assert_eq!(engine.mentions(&surface), vec![json!("aabbb")]);
}

#[test]
fn test_highlight_wraps_both_directions() {
    let options = MentionOptions::new().with_source(vec!["aaaaa", "aabbb", "aaccc", "bbbcc"]);
    let mut engine = Mention::new(options).unwrap();
    let mut surface = PlainSurface::new();

    let now = type_plain(&mut engine, &mut surface, "@aa", Instant::now());
    let now = settle(&mut engine, now);
    assert_eq!(engine.panel().candidates().len(), 3);

    engine.key_up(&mut surface, Key::Up, now).unwrap();
    assert_eq!(engine.panel().highlighted(), 2);
    engine.key_up(&mut surface, Key::Down, now).unwrap();
    assert_eq!(engine.panel().highlighted(), 0);
}

#[test]
fn test_burst_of_keystrokes_queries_once() {
    let queries: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&queries);
    let options = MentionOptions::new().with_callback_source(move |token, sink| {
        seen.borrow_mut().push(token.to_string());
        sink.deliver(vec![json!(token)]);
    });
    let mut engine = Mention::new(options).unwrap();
    let mut surface = PlainSurface::new();

    let now = type_plain(&mut engine, &mut surface, "@abcd", Instant::now());
    settle(&mut engine, now);

    // Five keystrokes, one query, for the final token only.
    assert_eq!(*queries.borrow(), vec!["abcd".to_string()]);
}

#[test]
fn test_late_delivery_opens_panel_on_pump() {
    let slot: Rc<RefCell<Vec<mentionr::source::ResultSink>>> = Rc::new(RefCell::new(Vec::new()));
    let held = Rc::clone(&slot);
    let options =
        MentionOptions::new().with_callback_source(move |_, sink| held.borrow_mut().push(sink));
    let mut engine = Mention::new(options).unwrap();
    let mut surface = PlainSurface::new();

    let now = type_plain(&mut engine, &mut surface, "@ab", Instant::now());
    let now = settle(&mut engine, now);
    assert!(!engine.panel().is_visible());

    let sink = slot.borrow_mut().remove(0);
    sink.deliver(vec![json!("abel"), json!("abby")]);
    assert!(engine.pump(now));
    assert_eq!(engine.panel_rows(), vec!["abel", "abby"]);
}

#[test]
fn test_repeat_insertion_reports_single_mention() {
    let options = MentionOptions::new().with_source(vec!["alice"]);
    let mut engine = Mention::new(options).unwrap();
    let mut surface = PlainSurface::new();

    let now = type_plain(&mut engine, &mut surface, "@ali", Instant::now());
    let now = settle(&mut engine, now);
    engine.key_up(&mut surface, Key::Enter, now).unwrap();

    let now = type_plain(&mut engine, &mut surface, " @ali", now);
    let now = settle(&mut engine, now);
    engine.key_up(&mut surface, Key::Enter, now).unwrap();

    assert_eq!(surface.value(), "@alice @alice");
    assert_eq!(engine.mentions(&surface), vec![json!("alice")]);
}

#[test]
fn test_max_length_truncates_and_blurs_node_surface() {
    let options = MentionOptions::new().with_max_length(Some(10));
    let mut engine = Mention::new(options).unwrap();
    let mut surface = NodeSurface::new();

    for c in "0123456789abc".chars() {
        if surface.type_char(c) {
            engine.notify_edit(&mut surface);
        }
    }

    assert_eq!(surface.value(), "0123456789");
    assert!(!surface.is_focused());
}

#[test]
fn test_node_surface_insertion_creates_atomic_node() {
    let options = MentionOptions::new().with_source(vec!["alice"]);
    let mut engine = Mention::new(options).unwrap();
    let mut surface = NodeSurface::new();

    let mut now = Instant::now();
    for c in "hi @al".chars() {
        surface.type_char(c);
        now += Duration::from_millis(10);
        engine.key_up(&mut surface, Key::Char(c), now).unwrap();
    }
    let now = settle(&mut engine, now);
    assert_eq!(engine.panel_rows(), vec!["alice"]);

    engine.key_up(&mut surface, Key::Enter, now).unwrap();
    assert_eq!(
        surface.children(),
        &[
            Node::Text("hi ".into()),
            Node::Mention("@alice".into()),
            Node::Text(String::new()),
        ]
    );
    assert_eq!(surface.value(), "hi  @alice ");
    assert_eq!(engine.mentions(&surface), vec![json!("alice")]);

    // One backspace removes the whole mention node.
    surface.backspace();
    assert_eq!(surface.value(), "hi ");
    assert!(engine.mentions(&surface).is_empty());
}

#[test]
fn test_hosted_surface_atomic_insert_cycle() {
    let options = MentionOptions::new().with_source(vec!["alice"]);
    let mut engine = Mention::new(options).unwrap();
    let mut surface = HostedSurface::new(Box::new(EmbeddedDocument::new()), InsertMode::AtomicNode);
    assert!(surface.register());
    assert!(!surface.register());

    let mut now = Instant::now();
    for c in "hi @al".chars() {
        surface.host_mut().type_str(&c.to_string());
        now += Duration::from_millis(10);
        engine.key_up(&mut surface, Key::Char(c), now).unwrap();
    }
    let now = settle(&mut engine, now);

    engine.key_up(&mut surface, Key::Enter, now).unwrap();
    assert_eq!(surface.value(), "hi @alice");

    // The caret collapsed after the inserted node.
    surface.host_mut().type_str("!");
    assert_eq!(surface.value(), "hi @alice!");
}

#[test]
fn test_hosted_surface_plain_text_insert_cycle() {
    let options = MentionOptions::new()
        .with_source(vec!["alice"])
        .with_insert_mode(InsertMode::PlainText);
    let mut engine = Mention::new(options).unwrap();
    let mut surface = HostedSurface::new(Box::new(EmbeddedDocument::new()), InsertMode::PlainText);

    let mut now = Instant::now();
    for c in "hi @al".chars() {
        surface.host_mut().type_str(&c.to_string());
        now += Duration::from_millis(10);
        engine.key_up(&mut surface, Key::Char(c), now).unwrap();
    }
    let now = settle(&mut engine, now);

    engine.key_up(&mut surface, Key::Enter, now).unwrap();
    assert_eq!(surface.value(), "hi @alice");
    surface.host_mut().type_str("!");
    assert_eq!(surface.value(), "hi @alice!");
}

#[test]
fn test_dismissal_requires_new_trigger() {
    let options = MentionOptions::new().with_source(vec!["alice"]);
    let mut engine = Mention::new(options).unwrap();
    let mut surface = PlainSurface::new();

    let now = type_plain(&mut engine, &mut surface, "@ali", Instant::now());
    let now = settle(&mut engine, now);
    assert!(engine.panel().is_visible());

    // A space dismisses without inserting and schedules a new detection
    // that finds a token with a space in it, which matches nothing.
    surface.type_char(' ');
    engine.key_up(&mut surface, Key::Char(' '), now).unwrap();
    assert!(!engine.panel().is_visible());
    let _ = settle(&mut engine, now);
    assert!(!engine.panel().is_visible());
    assert_eq!(surface.value(), "@ali ");
}
