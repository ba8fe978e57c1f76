//! Mentionr demo entry point
//!
//! An interactive terminal editor exercising the mention engine end to
//! end: type the trigger character followed by at least two letters and
//! pick a candidate from the suggestion panel. On exit the demo prints
//! which mentions are still present in the document.
//!
//! # Usage
//!
//! ```bash
//! # Run with the built-in candidate list
//! mentionr
//!
//! # Candidates from a file, one per line
//! mentionr --source people.txt
//!
//! # Different trigger and a slower debounce
//! mentionr --delimiter '#' --delay 250
//!
//! # Cap the document length
//! mentionr --max-length 280
//! ```
//!
//! # Configuration
//!
//! Defaults are read from the user's config directory
//! (`~/.config/mentionr/config.toml` on Linux); command-line flags
//! override it. `--write-config` saves the effective settings back.

use clap::Parser;
use colored::Colorize;
use mentionr::{
    config::{DemoConfig, MentionOptions},
    engine::Mention,
    surface::PlainSurface,
    tui, MentionrError,
};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

type Result<T> = std::result::Result<T, MentionrError>;

const BUILTIN_CANDIDATES: &[&str] = &[
    "alice", "albert", "alfred", "bob", "bonnie", "carol", "carlos", "dave", "diana",
];

/// Interactive @mention autocomplete demo
#[derive(Debug, Parser)]
#[command(name = "mentionr", version, about)]
struct Cli {
    /// Candidate names file, one per line
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Load configuration from this file instead of the default path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trigger character
    #[arg(short = 'D', long)]
    delimiter: Option<char>,

    /// Debounce delay in milliseconds
    #[arg(short = 'd', long)]
    delay: Option<u64>,

    /// Maximum document length in characters
    #[arg(short, long)]
    max_length: Option<usize>,

    /// Save the effective settings to the default config path and exit
    #[arg(long)]
    write_config: bool,
}

/// Merge file configuration and command-line flags, flags winning
fn effective_config(cli: &Cli) -> Result<DemoConfig> {
    let mut config = match &cli.config {
        Some(path) => DemoConfig::load_from(path)?,
        None => DemoConfig::load()?,
    };
    if let Some(delimiter) = cli.delimiter {
        config.delimiter = delimiter;
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(max_length) = cli.max_length {
        config.max_length = Some(max_length);
    }
    Ok(config)
}

/// Candidate names: source file first, then config, then the built-ins
fn load_candidates(cli: &Cli, config: &DemoConfig) -> Result<Vec<String>> {
    if let Some(path) = &cli.source {
        let text = fs::read_to_string(path)?;
        return Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect());
    }
    if !config.candidates.is_empty() {
        return Ok(config.candidates.clone());
    }
    Ok(BUILTIN_CANDIDATES.iter().map(|&s| s.to_string()).collect())
}

fn run(cli: &Cli) -> Result<()> {
    let config = effective_config(cli)?;

    if cli.write_config {
        let path = DemoConfig::config_path()?;
        config.save_to(&path)?;
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    let candidates = load_candidates(cli, &config)?;
    let (min, max) = config.match_range;

    let options = MentionOptions::new()
        .with_source(candidates)
        .with_delimiter(config.delimiter)
        .with_delay(Duration::from_millis(config.delay_ms))
        .with_match_range(min, max)
        .with_max_length(config.max_length)
        .with_insert_mode(config.insert_mode);
    let engine = Mention::new(options)?;

    let mut surface = PlainSurface::new();
    surface.set_max_length(config.max_length);

    let (engine, surface) = tui::run(engine, surface)?;

    let mentions = engine.mentions(&surface);
    if mentions.is_empty() {
        println!("No mentions in the final document.");
    } else {
        println!("{}", "Mentions in the final document:".bold());
        for mention in mentions {
            match mention.as_str() {
                Some(name) => println!("  - {}", name.cyan()),
                None => println!("  - {mention}"),
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}
