//! Abbreviation substitution over section bodies.
//!
//! All terms are compiled into a single case-insensitive alternation, longest
//! term first, so "myocardial infarction" is replaced before "infarction" can
//! claim part of it. A body is rewritten until a pass changes nothing, so a
//! short form that combines with its neighbours into another term
//! ("HF exacerbation") is picked up too.

use std::collections::HashMap;

use regex::{Captures, Regex};
use tracing::{debug, warn};

use ednote_core::{AbbreviationTable, CanonicalSection, StructuredNote, MISSING_DATA};

/// Upper bound on substitution passes per body. Cyclic tables
/// (`a → b`, `b → a`) stop here.
pub const MAX_PASSES: usize = 8;

/// Compiled substitution pass for one abbreviation table.
#[derive(Debug, Clone)]
pub struct Normalizer {
    pattern: Option<Regex>,
    /// Lowercased, whitespace-collapsed term → replacement.
    replacements: HashMap<String, String>,
}

impl Normalizer {
    pub fn new(table: &AbbreviationTable) -> Self {
        let mut terms: Vec<(&str, &str)> = table
            .iter()
            .filter(|(term, _)| !term.trim().is_empty())
            .collect();
        terms.sort_by(|a, b| {
            b.0.chars()
                .count()
                .cmp(&a.0.chars().count())
                .then_with(|| a.0.cmp(b.0))
        });

        let mut replacements = HashMap::with_capacity(terms.len());
        let mut alternatives = Vec::with_capacity(terms.len());
        for (term, short) in &terms {
            let key = term_key(term);
            if replacements.contains_key(&key) {
                continue;
            }
            replacements.insert(key, short.to_string());
            alternatives.push(term_pattern(term));
        }

        let pattern = if alternatives.is_empty() {
            None
        } else {
            match Regex::new(&format!("(?i)(?:{})", alternatives.join("|"))) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("Abbreviation table could not be compiled, skipping normalization: {}", e);
                    None
                }
            }
        };

        Self {
            pattern,
            replacements,
        }
    }

    /// Replace every whole-word term occurrence in `body`, repeating until
    /// the text is stable.
    pub fn normalize(&self, body: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return body.to_string();
        };
        if body == MISSING_DATA {
            return body.to_string();
        }

        let mut current = body.to_string();
        for pass in 1..=MAX_PASSES {
            let next = self.substitute(pattern, &current);
            if next == current {
                return current;
            }
            debug!("Normalization pass {} rewrote {} chars", pass, current.len());
            current = next;
        }
        warn!(
            "Abbreviation substitution did not settle after {} passes; table may be cyclic",
            MAX_PASSES
        );
        current
    }

    fn substitute(&self, pattern: &Regex, text: &str) -> String {
        pattern
            .replace_all(text, |caps: &Captures| {
                let matched = &caps[0];
                self.replacements
                    .get(&term_key(matched))
                    .cloned()
                    .unwrap_or_else(|| matched.to_string())
            })
            .into_owned()
    }

    /// Normalize every section body of `note` in place.
    pub fn normalize_note(&self, note: &mut StructuredNote) {
        if self.pattern.is_none() {
            return;
        }
        for section in CanonicalSection::ALL {
            let normalized = self.normalize(note.get(section));
            note.set(section, normalized.trim());
        }
    }

    pub fn is_noop(&self) -> bool {
        self.pattern.is_none()
    }
}

fn term_key(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Escaped term with a word boundary on each edge that is a word character.
/// Inner whitespace matches any whitespace run.
fn term_pattern(term: &str) -> String {
    let term = term.trim();
    let body = term
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let before = if term.starts_with(is_word_char) { r"\b" } else { "" };
    let after = if term.ends_with(is_word_char) { r"\b" } else { "" };
    format!("{}{}{}", before, body, after)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(pairs: &[(&str, &str)]) -> Normalizer {
        Normalizer::new(&AbbreviationTable::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn test_longest_match_first() {
        let n = normalizer(&[("myocardial infarction", "MI"), ("infarction", "INF")]);
        assert_eq!(n.normalize("acute myocardial infarction noted"), "acute MI noted");
        assert_eq!(n.normalize("old infarction"), "old INF");
    }

    #[test]
    fn test_case_insensitive() {
        let n = normalizer(&[("hypertension", "HTN")]);
        assert_eq!(n.normalize("History of Hypertension."), "History of HTN.");
        assert_eq!(n.normalize("HYPERTENSION"), "HTN");
    }

    #[test]
    fn test_whole_words_only() {
        let n = normalizer(&[("hypertension", "HTN")]);
        assert_eq!(n.normalize("hypertensive urgency"), "hypertensive urgency");
        assert_eq!(n.normalize("prehypertension"), "prehypertension");
    }

    #[test]
    fn test_terms_with_punctuation() {
        let n = normalizer(&[("c/o", "complains of")]);
        assert_eq!(n.normalize("Pt c/o chest pain"), "Pt complains of chest pain");
        assert_eq!(n.normalize("abc/op"), "abc/op");
    }

    #[test]
    fn test_multiword_term_spans_line_breaks() {
        let n = normalizer(&[("myocardial infarction", "MI")]);
        assert_eq!(n.normalize("prior myocardial\ninfarction"), "prior MI");
    }

    #[test]
    fn test_idempotent() {
        let n = Normalizer::new(&AbbreviationTable::default());
        let once = n.normalize("Pt c/o SOB, hx of hypertension and myocardial infarction.");
        let twice = n.normalize(&once);
        assert_eq!(once, "Pt complains of shortness of breath, hx of HTN and MI.");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_short_form_joining_a_longer_term() {
        let n = normalizer(&[("heart failure", "HF"), ("HF exacerbation", "HFE")]);
        let once = n.normalize("acute heart failure exacerbation");
        assert_eq!(once, "acute HFE");
        assert_eq!(n.normalize(&once), once);
    }

    #[test]
    fn test_cyclic_table_terminates() {
        let n = normalizer(&[("alpha", "beta"), ("beta", "alpha")]);
        let out = n.normalize("alpha");
        assert!(out == "alpha" || out == "beta");
    }

    #[test]
    fn test_empty_table_is_noop() {
        let n = Normalizer::new(&AbbreviationTable::empty());
        assert!(n.is_noop());
        assert_eq!(n.normalize("myocardial infarction"), "myocardial infarction");
    }

    #[test]
    fn test_missing_placeholder_untouched() {
        let n = normalizer(&[("missing", "MISS"), ("data", "D")]);
        assert_eq!(n.normalize(MISSING_DATA), MISSING_DATA);
    }

    #[test]
    fn test_normalize_note_per_section() {
        let mut note = StructuredNote::new();
        note.set(CanonicalSection::Hpi, "c/o chest pain");
        note.set(CanonicalSection::Mdm, "r/o myocardial infarction");
        Normalizer::new(&AbbreviationTable::default()).normalize_note(&mut note);
        assert_eq!(note.get(CanonicalSection::Hpi), "complains of chest pain");
        assert_eq!(note.get(CanonicalSection::Mdm), "r/o MI");
        assert_eq!(note.get(CanonicalSection::Ros), "");
    }
}
