//! Abbreviation tables: full medical term → short form.
//!
//! Tables come from the built-in defaults or from an uploaded JSON object of
//! `{"full term": "short form"}`. A malformed upload never stops formatting:
//! [`AbbreviationTable::from_json_or_default`] hands back the defaults together
//! with the parse error so the caller can report it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Built-in substitutions.
const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("myocardial infarction", "MI"),
    ("hypertension", "HTN"),
    ("c/o", "complains of"),
    ("SOB", "shortness of breath"),
    ("atrial fibrillation", "AFib"),
    ("congestive heart failure", "CHF"),
    ("chronic obstructive pulmonary disease", "COPD"),
    ("diabetes mellitus", "DM"),
];

/// Mapping from full term to its replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbbreviationTable {
    terms: BTreeMap<String, String>,
}

impl AbbreviationTable {
    /// An empty table (normalization becomes a no-op).
    pub fn empty() -> Self {
        Self {
            terms: BTreeMap::new(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::empty();
        for (term, short) in pairs {
            table.insert(term, short);
        }
        table
    }

    /// Add a term. Blank terms are ignored.
    pub fn insert(&mut self, term: impl Into<String>, short: impl Into<String>) {
        let term = term.into().trim().to_string();
        if !term.is_empty() {
            self.terms.insert(term, short.into());
        }
    }

    /// Parse an uploaded JSON object of `{term: shortForm}`.
    pub fn from_json(source: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(source)
            .map_err(|e| Error::InvalidAbbreviationSource(e.to_string()))?;
        Self::from_json_value(&value)
    }

    /// Build a table from an already-parsed JSON value.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::InvalidAbbreviationSource(
                "expected a JSON object of {\"term\": \"abbreviation\"}".into(),
            )
        })?;

        let mut table = Self::empty();
        for (term, short) in object {
            let short = short.as_str().ok_or_else(|| {
                Error::InvalidAbbreviationSource(format!(
                    "value for '{}' is not a string",
                    term
                ))
            })?;
            table.insert(term.as_str(), short);
        }
        Ok(table)
    }

    /// Parse `source`, falling back to the default table when it is malformed.
    pub fn from_json_or_default(source: &str) -> (Self, Option<Error>) {
        match Self::from_json(source) {
            Ok(table) => (table, None),
            Err(e) => {
                warn!("Falling back to default abbreviations: {}", e);
                (Self::default(), Some(e))
            }
        }
    }

    /// Read a JSON abbreviation file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// Read a JSON abbreviation file, falling back to the default table on any failure.
    pub fn load_file_or_default(path: &Path) -> (Self, Option<Error>) {
        match Self::load_file(path) {
            Ok(table) => (table, None),
            Err(e) => {
                warn!(
                    "Could not load abbreviations from {}: {}; using defaults",
                    path.display(),
                    e
                );
                (Self::default(), Some(e))
            }
        }
    }

    pub fn get(&self, term: &str) -> Option<&str> {
        self.terms.get(term).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for AbbreviationTable {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_ABBREVIATIONS.iter().copied())
    }
}
