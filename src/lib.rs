//! Mentionr - a caret-aware @mention autocomplete engine
//!
//! This library implements the trigger-detection, suggestion-matching and
//! insertion-coordination machinery behind "@mention" autocomplete on text
//! editing surfaces. Heterogeneous surfaces (a flat textarea-style buffer,
//! a node-tree rich editor, an externally hosted rich-text document) each
//! have their own idea of "where is the caret"; all of them drive one
//! shared engine with identical trigger, navigation and selection
//! semantics.
//!
//! The pieces:
//!
//! - [`token`] extracts the live query token behind the caret.
//! - [`source`] supplies candidates, from a static collection or a host
//!   callback with asynchronous delivery.
//! - [`engine::Mention`] owns the debounced match pipeline, the suggestion
//!   panel state machine and the inserted-mention records.
//! - [`surface`] defines the caret locator seam and the three concrete
//!   surface adapters.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub mod config;
pub mod engine;
pub mod source;
pub mod surface;
pub mod token;
pub mod tui;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum MentionrError {
    /// Surface adapter error
    #[error("Surface error: {0}")]
    SurfaceError(#[from] surface::SurfaceError),
    /// Invalid engine options
    #[error("Options error: {0}")]
    OptionsError(#[from] config::OptionsError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Candidate payload could not be fingerprinted
    #[error("Fingerprint error: {0}")]
    FingerprintError(#[from] serde_json::Error),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// One formatted suggestion-list entry.
///
/// `text` is what the panel shows and what the default mention formatter
/// inserts; `data` is the opaque host payload the candidate was built
/// from, carried along so selection callbacks receive the original shape.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Candidate {
    pub text: String,
    pub data: Value,
}

impl Candidate {
    /// Create a new Candidate
    #[must_use]
    pub const fn new(text: String, data: Value) -> Self {
        Self { text, data }
    }

    /// Build a candidate from a raw source value.
    ///
    /// Strings become their own display text, objects use their `text`
    /// field when present, anything else falls back to its JSON form.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let text = match &value {
            Value::String(s) => s.clone(),
            Value::Object(map) => map
                .get("text")
                .and_then(Value::as_str)
                .map_or_else(|| value.to_string(), str::to_string),
            other => other.to_string(),
        };
        Self { text, data: value }
    }
}
