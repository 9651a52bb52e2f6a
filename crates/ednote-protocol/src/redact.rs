//! Person-name redaction using regex patterns.

use std::collections::HashSet;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// Replacement text for a removed name.
pub const REDACTED: &str = "[REDACTED]";

/// Anything that rewrites raw note text before it is formatted.
pub trait Redactor: Send + Sync {
    fn redact(&self, text: &str) -> String;
}

/// How a name was recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// `Dr. Smith`, `Mrs. Jane Doe`; the honorific is removed with the name.
    HonorificName,
    /// `Patient: John Doe`; only the value is removed, the label stays.
    LabeledName,
}

/// A removed name with its byte range in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedactedEntity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Result of redacting text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redaction {
    pub text: String,
    pub entities: Vec<RedactedEntity>,
}

// Name tokens are capitalized words on one line, so "HPI" or "BP" never read
// as names and a name never runs into the next line.
static HONORIFIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:Dr|Mr|Mrs|Ms|Prof)\.?[ \t]+(?P<name>[A-Z][a-z]+(?:['-][A-Z]?[a-z]+)*(?:[ \t]+[A-Z][a-z]+(?:['-][A-Z]?[a-z]+)*)?)",
    )
    .unwrap()
});
static LABELED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:Patient Name|Patient|Pt Name|Name)[ \t]*:[ \t]*(?P<name>[A-Z][a-z]+(?:['-][A-Z]?[a-z]+)*(?:[ \t]+[A-Z][a-z]+(?:['-][A-Z]?[a-z]+)*){0,2})",
    )
    .unwrap()
});
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

/// Capitalized words that open section headers or clinical statements and
/// are never taken as part of a name.
const NON_NAME_WORDS: &[&str] = &[
    // header openers
    "chief", "complaint", "reason", "history", "hpi", "review", "ros", "ed", "vital",
    "vitals", "physical", "exam", "examination", "pe", "labs", "imaging", "results",
    "current", "medications", "medical", "decision", "assessment", "plan", "mdm",
    "prior", "pta", "scheduled", "continuous", "prn",
    // statement openers
    "denies", "reports", "endorses", "complains", "presents", "lungs", "heart",
    "extremities", "abdomen", "received", "took", "no", "none", "unknown", "patient",
    "pt", "admit", "discharge",
];

static NON_NAME_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| NON_NAME_WORDS.iter().copied().collect());

fn is_non_name(token: &str) -> bool {
    NON_NAME_SET.contains(token.to_ascii_lowercase().as_str())
}

/// End of the leading run of name tokens in `text[span]`, stopping at the
/// first header or clinical word. `None` when the first token is one.
fn name_end(text: &str, span: Range<usize>) -> Option<usize> {
    let mut end = None;
    for token in TOKEN_RE.find_iter(&text[span.clone()]) {
        if is_non_name(token.as_str()) {
            break;
        }
        end = Some(span.start + token.end());
    }
    end
}

/// Removes person names recognisable from their surroundings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameRedactor;

impl NameRedactor {
    pub fn new() -> Self {
        Self
    }

    /// Find names, ordered by position, without overlaps.
    pub fn detect(&self, text: &str) -> Vec<RedactedEntity> {
        let mut entities = Vec::new();

        for caps in HONORIFIC_RE.captures_iter(text) {
            let (Some(m), Some(name)) = (caps.get(0), caps.name("name")) else {
                continue;
            };
            let Some(mut end) = name_end(text, name.range()) else {
                continue;
            };
            // "Dr. Smith Vitals: ..." keeps the header word.
            if text[end..].starts_with(':') {
                if let Some(first) = TOKEN_RE.find(name.as_str()) {
                    end = end.min(name.start() + first.end());
                }
            }
            entities.push(RedactedEntity {
                kind: EntityKind::HonorificName,
                start: m.start(),
                end,
                text: text[m.start()..end].to_string(),
            });
        }

        for caps in LABELED_RE.captures_iter(text) {
            let Some(name) = caps.name("name") else {
                continue;
            };
            if let Some(end) = name_end(text, name.range()) {
                entities.push(RedactedEntity {
                    kind: EntityKind::LabeledName,
                    start: name.start(),
                    end,
                    text: text[name.start()..end].to_string(),
                });
            }
        }

        // Sort by position, longest match first for overlapping
        entities.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut filtered = Vec::new();
        let mut last_end = 0;
        for entity in entities {
            if entity.start >= last_end {
                last_end = entity.end;
                filtered.push(entity);
            }
        }
        filtered
    }

    /// Replace every detected name with [`REDACTED`].
    pub fn redact_with_report(&self, text: &str) -> Redaction {
        let entities = self.detect(text);
        if entities.is_empty() {
            return Redaction {
                text: text.to_string(),
                entities,
            };
        }

        let mut result = String::with_capacity(text.len());
        let mut last_end = 0;
        for entity in &entities {
            result.push_str(&text[last_end..entity.start]);
            result.push_str(REDACTED);
            last_end = entity.end;
        }
        result.push_str(&text[last_end..]);

        debug!("Redacted {} names", entities.len());
        Redaction {
            text: result,
            entities,
        }
    }
}

impl Redactor for NameRedactor {
    fn redact(&self, text: &str) -> String {
        self.redact_with_report(text).text
    }
}
