//! Text units and the per-section structured note.

use std::ops::Range;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::section::CanonicalSection;

/// Placeholder body for a header-mode section whose header was never found.
pub const MISSING_DATA: &str = "[Missing Data]";

/// An atomic slice of the input: one sentence or one header-delimited block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    pub text: String,
    /// Byte range into the original input.
    pub span: Range<usize>,
    /// Assigned section, `None` until classified.
    pub section: Option<CanonicalSection>,
}

impl TextUnit {
    pub fn new(text: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            text: text.into(),
            span,
            section: None,
        }
    }

    pub fn with_section(mut self, section: CanonicalSection) -> Self {
        self.section = Some(section);
        self
    }

    /// The assigned section, or `Uncategorized` when none was assigned.
    pub fn section_or_uncategorized(&self) -> CanonicalSection {
        self.section.unwrap_or(CanonicalSection::Uncategorized)
    }
}

/// Non-fatal conditions raised while formatting a note.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatWarning {
    #[error("no section headers found; every section is marked as missing")]
    NoSectionsFound,
}

/// Section → body mapping with exactly one entry per canonical section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredNote {
    bodies: [String; CanonicalSection::COUNT],
    warnings: Vec<FormatWarning>,
}

impl StructuredNote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, section: CanonicalSection) -> &str {
        &self.bodies[section.rank()]
    }

    pub fn set(&mut self, section: CanonicalSection, body: impl Into<String>) {
        self.bodies[section.rank()] = body.into();
    }

    pub fn body_mut(&mut self, section: CanonicalSection) -> &mut String {
        &mut self.bodies[section.rank()]
    }

    /// True when the section has real content (not empty, not the missing placeholder).
    pub fn has_content(&self, section: CanonicalSection) -> bool {
        let body = self.get(section).trim();
        !body.is_empty() && body != MISSING_DATA
    }

    /// All sections with their bodies, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalSection, &str)> {
        CanonicalSection::ALL
            .into_iter()
            .map(move |s| (s, self.get(s)))
    }

    /// Sections with real content, in canonical order.
    pub fn present(&self) -> impl Iterator<Item = (CanonicalSection, &str)> {
        self.iter().filter(move |(s, _)| self.has_content(*s))
    }

    pub fn warnings(&self) -> &[FormatWarning] {
        &self.warnings
    }

    pub fn push_warning(&mut self, warning: FormatWarning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }
}

impl Serialize for StructuredNote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CanonicalSection::COUNT))?;
        for (section, body) in self.iter() {
            map.serialize_entry(section.label(), body)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_section_has_an_entry() {
        let note = StructuredNote::new();
        assert_eq!(note.iter().count(), CanonicalSection::COUNT);
        assert!(note.iter().all(|(_, body)| body.is_empty()));
    }

    #[test]
    fn test_has_content_skips_placeholder() {
        let mut note = StructuredNote::new();
        note.set(CanonicalSection::Hpi, "pain for 2 days.");
        note.set(CanonicalSection::Ros, MISSING_DATA);
        note.set(CanonicalSection::Mdm, "   ");
        assert!(note.has_content(CanonicalSection::Hpi));
        assert!(!note.has_content(CanonicalSection::Ros));
        assert!(!note.has_content(CanonicalSection::Mdm));
        let present: Vec<_> = note.present().map(|(s, _)| s).collect();
        assert_eq!(present, vec![CanonicalSection::Hpi]);
    }

    #[test]
    fn test_serializes_in_canonical_order() {
        let mut note = StructuredNote::new();
        note.set(CanonicalSection::Uncategorized, "misc");
        note.set(CanonicalSection::ChiefComplaint, "chest pain");
        let json = serde_json::to_string(&note).unwrap();
        assert!(json.starts_with("{\"Chief Complaint\":\"chest pain\",\"HPI\":\"\""));
        assert!(json.ends_with("\"Uncategorized\":\"misc\"}"));
    }

    #[test]
    fn test_warnings_are_deduplicated() {
        let mut note = StructuredNote::new();
        note.push_warning(FormatWarning::NoSectionsFound);
        note.push_warning(FormatWarning::NoSectionsFound);
        assert_eq!(note.warnings().len(), 1);
    }

    #[test]
    fn test_unit_defaults_to_uncategorized() {
        let unit = TextUnit::new("stable", 0..6);
        assert_eq!(unit.section_or_uncategorized(), CanonicalSection::Uncategorized);
        let unit = unit.with_section(CanonicalSection::Mdm);
        assert_eq!(unit.section_or_uncategorized(), CanonicalSection::Mdm);
    }
}
