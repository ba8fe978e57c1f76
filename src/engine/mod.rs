//! Mention engine
//!
//! Composition root tying the delimiter parser, the debounced match
//! pipeline, the suggestion panel and the insertion records together.
//! Surface adapters hand their native key events to one [`Mention`]
//! instance and obey its dispositions: the engine consumes the
//! navigation keys only while the panel is visible, everything else
//! passes through to the surface untouched.
//!
//! The engine never blocks an event handler. Debouncing is a recorded
//! deadline fired by [`Mention::pump`], which the host's event loop calls
//! on its tick; asynchronous source deliveries cross back into the engine
//! on the same call.

mod insert;
mod matcher;
mod panel;

pub use insert::MentionRecord;
pub use panel::PanelState;

use crate::config::{
    AddHandler, CandidateFormatter, ChangeHandler, ChangeKind, Formatter, InsertMode,
    MentionOptions,
};
use crate::surface::{CaretBookmark, CaretPos, Surface};
use crate::{token, MentionrError};
use insert::MentionRecords;
use matcher::Matcher;
use std::time::Instant;

/// Keys the engine distinguishes; anything else is `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Char(char),
    Backspace,
    Other,
}

impl Key {
    const fn is_navigation(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Enter)
    }
}

/// What the surface should do with a key it just saw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The engine consumed the key; suppress the surface default
    Consumed,
    /// Not the engine's key; let the surface handle it
    PassThrough,
}

/// The shared mention engine one or more surface adapters delegate to
pub struct Mention {
    matcher: Matcher,
    panel: PanelState,
    records: MentionRecords,
    bookmark: Option<CaretBookmark>,
    anchor: CaretPos,
    delimiter: char,
    max_length: Option<usize>,
    insert_mode: InsertMode,
    formatter: Formatter,
    panel_formatter: CandidateFormatter,
    mention_formatter: CandidateFormatter,
    on_change: Option<ChangeHandler>,
    on_add: Option<AddHandler>,
    /// One-shot guard: a forced truncation must not re-report itself
    suppress_change: bool,
}

impl Mention {
    /// Build an engine from options
    ///
    /// # Errors
    ///
    /// Returns an error when the options fail validation.
    pub fn new(options: MentionOptions) -> Result<Self, MentionrError> {
        options.validate()?;
        let MentionOptions {
            source,
            delay,
            match_range,
            delimiter,
            max_length,
            insert_mode,
            formatter,
            panel_formatter,
            mention_formatter,
            on_change,
            on_add,
        } = options;
        Ok(Self {
            matcher: Matcher::new(source, delay, match_range),
            panel: PanelState::new(),
            records: MentionRecords::default(),
            bookmark: None,
            anchor: CaretPos::default(),
            delimiter,
            max_length,
            insert_mode,
            formatter,
            panel_formatter,
            mention_formatter,
            on_change,
            on_add,
            suppress_change: false,
        })
    }

    /// The panel state, for rendering
    #[must_use]
    pub const fn panel(&self) -> &PanelState {
        &self.panel
    }

    /// Where the panel should hang, recorded when the trigger was detected
    #[must_use]
    pub const fn panel_anchor(&self) -> CaretPos {
        self.anchor
    }

    /// Panel rows rendered through the host's panel formatter
    #[must_use]
    pub fn panel_rows(&self) -> Vec<String> {
        self.panel
            .candidates()
            .iter()
            .map(|c| (self.panel_formatter)(c))
            .collect()
    }

    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Insertion mode for hosted surfaces built next to this engine
    #[must_use]
    pub const fn insert_mode(&self) -> InsertMode {
        self.insert_mode
    }

    /// Key-down disposition: Up/Down/Enter are suppressed only while the
    /// panel is visible, so caret movement, line breaks and submits work
    /// normally otherwise
    pub fn key_down(&mut self, key: Key) -> KeyDisposition {
        if self.panel.is_visible() && key.is_navigation() {
            KeyDisposition::Consumed
        } else {
            KeyDisposition::PassThrough
        }
    }

    /// Key-up driver: panel navigation while visible, trigger detection
    /// otherwise. Any non-navigation key dismisses an open panel without
    /// inserting.
    ///
    /// # Errors
    ///
    /// Propagates surface errors from detection or insertion.
    pub fn key_up(
        &mut self,
        surface: &mut dyn Surface,
        key: Key,
        now: Instant,
    ) -> Result<KeyDisposition, MentionrError> {
        match key {
            Key::Up if self.panel.is_visible() => {
                self.panel.highlight_prev();
                Ok(KeyDisposition::Consumed)
            }
            Key::Down if self.panel.is_visible() => {
                self.panel.highlight_next();
                Ok(KeyDisposition::Consumed)
            }
            Key::Enter if self.panel.is_visible() => {
                self.select(surface, self.panel.highlighted())?;
                Ok(KeyDisposition::Consumed)
            }
            Key::Up | Key::Down | Key::Enter => Ok(KeyDisposition::PassThrough),
            Key::Char(_) | Key::Backspace | Key::Other => {
                if self.panel.is_visible() {
                    self.panel.clear();
                }
                self.detect(surface, now)?;
                Ok(KeyDisposition::PassThrough)
            }
        }
    }

    /// Run trigger detection against the text before the caret and
    /// schedule the debounced match. On a live token the caret bookmark
    /// and panel anchor are captured immediately, before any delay.
    fn detect(&mut self, surface: &mut dyn Surface, now: Instant) -> Result<(), MentionrError> {
        let before = surface.text_before_caret()?;
        let found = token::parse_before_caret(&before, self.delimiter).map(str::to_string);
        self.matcher.note_activity(found.clone(), now);
        if let Some(live) = found {
            self.bookmark = Some(surface.bookmark_caret(live.chars().count())?);
            self.anchor = surface.caret_position();
        }
        Ok(())
    }

    /// Fire the due debounce and apply asynchronous deliveries. Returns
    /// true when the panel changed and the host should redraw.
    pub fn pump(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.matcher.fire_due(now) {
            // A starting cycle never shows stale candidates; the brief
            // flicker on requery is accepted and visible to the host.
            if self.panel.is_visible() {
                changed = true;
            }
            self.panel.clear();
        }
        if let Some(raw) = self.matcher.drain() {
            let candidates = (self.formatter)(raw);
            self.panel.publish(candidates);
            changed = true;
        }
        changed
    }

    /// Insert the candidate at `index`: the Enter path and the mouse
    /// click path both land here. Without a captured bookmark there is
    /// nothing to replace and the call is a no-op; records and callbacks
    /// fire only on an actual insertion.
    ///
    /// # Errors
    ///
    /// Propagates surface errors; formatter and callback panics propagate
    /// uncaught.
    pub fn select(
        &mut self,
        surface: &mut dyn Surface,
        index: usize,
    ) -> Result<(), MentionrError> {
        let Some(candidate) = self.panel.candidate(index).cloned() else {
            return Ok(());
        };
        let Some(bookmark) = self.bookmark.take() else {
            return Ok(());
        };
        let rendered = (self.mention_formatter)(&candidate);
        surface.insert_at_bookmark(&bookmark, &rendered)?;
        self.records.record(rendered.clone(), candidate.data.clone())?;
        if let Some(on_add) = self.on_add.as_mut() {
            on_add(&rendered, &candidate.data);
        }
        let value = surface.value();
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(ChangeKind::Insert, &value);
        }
        self.panel.clear();
        Ok(())
    }

    /// Length-cap enforcement plus change notification for ordinary
    /// edits. The host calls this after every mutation it applies to the
    /// surface itself.
    pub fn notify_edit(&mut self, surface: &mut dyn Surface) {
        if self.suppress_change {
            self.suppress_change = false;
            return;
        }
        let value = surface.value();
        let reported = match self.max_length {
            Some(max) if value.chars().count() > max => {
                let truncated: String = value.chars().take(max).collect();
                if surface.enforce_max_length(max) {
                    self.suppress_change = true;
                }
                truncated
            }
            _ => value,
        };
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(ChangeKind::Edit, &reported);
        }
    }

    /// Source payloads whose mentions are currently present in the
    /// surface's value
    #[must_use]
    pub fn mentions(&self, surface: &dyn Surface) -> Vec<serde_json::Value> {
        self.records.present_in(&surface.value())
    }
}
