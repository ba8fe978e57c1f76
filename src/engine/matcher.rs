//! Debounced match pipeline
//!
//! Every keystroke replaces the single pending match; only the most
//! recently scheduled one ever fires. A fired cycle always clears the
//! panel before anything else, then gates the token length against the
//! match range and dispatches to the data source. Deliveries are stamped
//! with a generation counter: each fired cycle bumps the generation, so a
//! slow delivery from a superseded query can never overwrite a newer
//! candidate list.

use crate::source::{Delivery, ResultSink, Source};
use serde_json::Value;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct PendingMatch {
    token: Option<String>,
    due: Instant,
}

/// Debounce timer, range gate and source dispatcher
pub(crate) struct Matcher {
    source: Source,
    delay: Duration,
    match_range: (usize, usize),
    pending: Option<PendingMatch>,
    generation: u64,
    tx: Sender<Delivery>,
    rx: Receiver<Delivery>,
}

impl Matcher {
    pub fn new(source: Source, delay: Duration, match_range: (usize, usize)) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            delay,
            match_range,
            pending: None,
            generation: 0,
            tx,
            rx,
        }
    }

    /// Record key activity, canceling any previously pending match.
    /// Scheduled even without a token: firing with no token still clears
    /// the panel.
    pub fn note_activity(&mut self, token: Option<String>, now: Instant) {
        self.pending = Some(PendingMatch {
            token,
            due: now + self.delay,
        });
    }

    /// Fire the pending match once its deadline has passed. Returns true
    /// when a cycle fired, which obliges the caller to clear the panel.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        if !self.pending.as_ref().is_some_and(|p| p.due <= now) {
            return false;
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };
        // Every fired cycle invalidates earlier in-flight deliveries.
        self.generation += 1;
        if let Some(token) = pending.token {
            let len = token.chars().count();
            let (min, max) = self.match_range;
            if len >= min && len <= max {
                self.source
                    .dispatch(&token, ResultSink::new(self.generation, self.tx.clone()));
            }
        }
        true
    }

    /// Drain delivered results, keeping the freshest current-generation
    /// delivery and discarding stale ones
    pub fn drain(&mut self) -> Option<Vec<Value>> {
        let mut latest = None;
        while let Ok(delivery) = self.rx.try_recv() {
            if delivery.generation == self.generation {
                latest = Some(delivery.results);
            }
        }
        latest
    }
}
