//! Engine options and demo configuration
//!
//! `MentionOptions` carries the per-instance knobs of the mention engine,
//! builder style; every option has a default. `DemoConfig` is the demo
//! binary's file configuration, stored in the user's config directory.

use crate::source::Source;
use crate::Candidate;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Invalid option combinations
#[derive(Debug, Error)]
pub enum OptionsError {
    /// Match range lower bound exceeds the upper bound
    #[error("Invalid match range: min {0} > max {1}")]
    InvalidMatchRange(usize, usize),
}

/// How the hosted rich-text surface inserts a chosen mention.
///
/// Some host documents cannot carry custom nodes, so plain text insertion
/// is available as a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertMode {
    /// Insert as an atomic button-like node
    #[default]
    AtomicNode,
    /// Insert as a plain text node
    PlainText,
}

/// Why `on_change` fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// An ordinary edit on the surface
    Edit,
    /// A mention insertion
    Insert,
}

/// Maps the raw source results to display-ready candidates
pub type Formatter = Box<dyn FnMut(Vec<Value>) -> Vec<Candidate>>;
/// Maps one candidate to a rendered string (panel row or inserted content)
pub type CandidateFormatter = Box<dyn Fn(&Candidate) -> String>;
/// Fired whenever the surface's logical value changes
pub type ChangeHandler = Box<dyn FnMut(ChangeKind, &str)>;
/// Fired once per successful insertion: `(rendered, payload)`
pub type AddHandler = Box<dyn FnMut(&str, &Value)>;

/// Per-instance engine options. All optional with defaults.
pub struct MentionOptions {
    pub(crate) source: Source,
    pub(crate) delay: Duration,
    pub(crate) match_range: (usize, usize),
    pub(crate) delimiter: char,
    pub(crate) max_length: Option<usize>,
    pub(crate) insert_mode: InsertMode,
    pub(crate) formatter: Formatter,
    pub(crate) panel_formatter: CandidateFormatter,
    pub(crate) mention_formatter: CandidateFormatter,
    pub(crate) on_change: Option<ChangeHandler>,
    pub(crate) on_add: Option<AddHandler>,
}

impl Default for MentionOptions {
    fn default() -> Self {
        Self {
            source: Source::default(),
            delay: Duration::from_millis(100),
            match_range: (2, 8),
            delimiter: '@',
            max_length: None,
            insert_mode: InsertMode::default(),
            formatter: Box::new(|raw| raw.into_iter().map(Candidate::from_value).collect()),
            panel_formatter: Box::new(|c| c.text.clone()),
            mention_formatter: Box::new(|c| format!("@{}", c.text)),
            on_change: None,
            on_add: None,
        }
    }
}

impl fmt::Debug for MentionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MentionOptions")
            .field("source", &self.source)
            .field("delay", &self.delay)
            .field("match_range", &self.match_range)
            .field("delimiter", &self.delimiter)
            .field("max_length", &self.max_length)
            .field("insert_mode", &self.insert_mode)
            .finish_non_exhaustive()
    }
}

impl MentionOptions {
    /// Create options with all defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidate data source
    #[must_use]
    pub fn with_source(mut self, source: impl Into<Source>) -> Self {
        self.source = source.into();
        self
    }

    /// Set a callback source: `(token, sink)`, expected to deliver once
    #[must_use]
    pub fn with_callback_source(
        mut self,
        query: impl Fn(&str, crate::source::ResultSink) + 'static,
    ) -> Self {
        self.source = Source::Callback(Box::new(query));
        self
    }

    /// Debounce delay before a query fires (default 100ms)
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Inclusive token length bounds that permit a query (default `[2, 8]`)
    #[must_use]
    pub const fn with_match_range(mut self, min: usize, max: usize) -> Self {
        self.match_range = (min, max);
        self
    }

    /// Trigger character (default `@`)
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Cap on the surface's derived plain value; `None` disables
    #[must_use]
    pub const fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }

    /// Insertion primitive for the hosted rich-text surface
    #[must_use]
    pub const fn with_insert_mode(mut self, mode: InsertMode) -> Self {
        self.insert_mode = mode;
        self
    }

    /// Map raw source results to candidates (default: identity shapes)
    #[must_use]
    pub fn with_formatter(
        mut self,
        formatter: impl FnMut(Vec<Value>) -> Vec<Candidate> + 'static,
    ) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Render one candidate as a panel row (default: its text)
    #[must_use]
    pub fn with_panel_formatter(mut self, formatter: impl Fn(&Candidate) -> String + 'static) -> Self {
        self.panel_formatter = Box::new(formatter);
        self
    }

    /// Render one chosen candidate as inserted content (default `@text`)
    #[must_use]
    pub fn with_mention_formatter(
        mut self,
        formatter: impl Fn(&Candidate) -> String + 'static,
    ) -> Self {
        self.mention_formatter = Box::new(formatter);
        self
    }

    /// Fired whenever the surface's logical value changes
    #[must_use]
    pub fn on_change(mut self, handler: impl FnMut(ChangeKind, &str) + 'static) -> Self {
        self.on_change = Some(Box::new(handler));
        self
    }

    /// Fired once per successful insertion, before `on_change`
    #[must_use]
    pub fn on_add(mut self, handler: impl FnMut(&str, &Value) + 'static) -> Self {
        self.on_add = Some(Box::new(handler));
        self
    }

    /// Check option invariants
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::InvalidMatchRange` when the lower bound of
    /// the match range exceeds the upper bound.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let (min, max) = self.match_range;
        if min > max {
            return Err(OptionsError::InvalidMatchRange(min, max));
        }
        Ok(())
    }
}

/// Demo application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DemoConfig {
    /// Trigger character
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Debounce delay in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Inclusive token length bounds that permit a query
    #[serde(default = "default_match_range")]
    pub match_range: (usize, usize),

    /// Cap on the editor value length; absent disables
    #[serde(default)]
    pub max_length: Option<usize>,

    /// Insertion mode for hosted documents
    #[serde(default)]
    pub insert_mode: InsertMode,

    /// Candidate names offered when no source file is given
    #[serde(default)]
    pub candidates: Vec<String>,
}

fn default_delimiter() -> char {
    '@'
}

fn default_delay_ms() -> u64 {
    100
}

fn default_match_range() -> (usize, usize) {
    (2, 8)
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            delay_ms: default_delay_ms(),
            match_range: default_match_range(),
            max_length: None,
            insert_mode: InsertMode::default(),
            candidates: Vec::new(),
        }
    }
}

impl DemoConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be
    /// determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("mentionr").join("config.toml"))
    }

    /// Load configuration from the default path, falling back to defaults
    /// when no file exists yet
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml))
            .build()?;
        settings.try_deserialize()
    }

    /// Save configuration to a specific file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the
    /// configuration cannot be serialized, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;
        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config: {e}")))?;
        Ok(())
    }
}
