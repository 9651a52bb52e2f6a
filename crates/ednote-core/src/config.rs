//! Runtime configuration read from the environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::abbreviations::AbbreviationTable;
use crate::error::{Error, Result};
use crate::section::SegmentMode;

/// Schema version stamped into every SOAP document.
pub const DEFAULT_NOTE_VERSION: &str = "1.1";

pub const DEFAULT_PORT: u16 = 3003;

/// Top-level ednote configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdNoteConfig {
    /// HTTP server port.
    pub port: u16,
    /// Segmentation mode used when a request does not name one.
    pub mode: SegmentMode,
    /// Optional JSON file replacing the built-in abbreviation table.
    pub abbreviations_path: Option<PathBuf>,
    /// Strip person names before segmentation.
    pub redact: bool,
    pub note_version: String,
}

impl Default for EdNoteConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            mode: SegmentMode::default(),
            abbreviations_path: None,
            redact: false,
            note_version: DEFAULT_NOTE_VERSION.to_string(),
        }
    }
}

impl EdNoteConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let mode = match lookup("EDNOTE_MODE") {
            Some(m) if !m.trim().is_empty() => m.parse()?,
            _ => SegmentMode::default(),
        };

        let abbreviations_path = lookup("EDNOTE_ABBREVIATIONS")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let redact = match lookup("EDNOTE_REDACT") {
            Some(v) => parse_flag(&v)?,
            None => false,
        };

        let note_version = lookup("EDNOTE_NOTE_VERSION")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NOTE_VERSION.to_string());

        Ok(Self {
            port,
            mode,
            abbreviations_path,
            redact,
            note_version,
        })
    }

    /// The configured abbreviation table. A bad file falls back to the defaults
    /// and the error is returned alongside.
    pub fn load_abbreviations(&self) -> (AbbreviationTable, Option<Error>) {
        match &self.abbreviations_path {
            Some(path) => AbbreviationTable::load_file_or_default(path),
            None => (AbbreviationTable::default(), None),
        }
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::Config(format!("invalid boolean flag '{}'", other))),
    }
}
