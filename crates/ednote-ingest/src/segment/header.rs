//! Header-anchored block extraction.
//!
//! Each section is anchored on the first match of its header pattern. A
//! block runs from the end of its header to the nearest header match of any
//! section in the remaining text. Text outside every header and block is
//! returned as `Uncategorized` units.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use ednote_core::{CanonicalSection, Error, Result, TextUnit};

/// Built-in header spellings per section, scanned in canonical order.
const DEFAULT_HEADERS: &[(CanonicalSection, &[&str])] = &[
    (
        CanonicalSection::ChiefComplaint,
        &["Chief Complaint:", "Reason for Visit:", "CC:"],
    ),
    (
        CanonicalSection::Hpi,
        &["History of Present Illness:", "HPI:"],
    ),
    (CanonicalSection::Ros, &["Review of Systems:", "ROS:"]),
    (
        CanonicalSection::EdVitals,
        &["ED Vitals:", "Vital Signs:", "Vitals:"],
    ),
    (
        CanonicalSection::PhysicalExam,
        &["Physical Examination:", "Physical Exam:", "PE:", "Exam:"],
    ),
    (
        CanonicalSection::LabsImaging,
        &["Labs & Imaging:", "Labs and Imaging:", "Labs:", "Imaging:", "Results:"],
    ),
    (
        CanonicalSection::Medications,
        &["Current Medications:", "ED Medications:", "Medications:"],
    ),
    (
        CanonicalSection::Mdm,
        &[
            "Medical Decision Making:",
            "Assessment and Plan:",
            "Assessment/Plan:",
            "Assessment:",
            "MDM:",
            "A/P:",
        ],
    ),
    (
        CanonicalSection::PriorToAdmission,
        &["Prior to Admission:", "PTA:"],
    ),
];

static DEFAULT_PATTERNS: Lazy<HeaderPatterns> = Lazy::new(|| {
    let mut patterns = HeaderPatterns::empty();
    for (section, headers) in DEFAULT_HEADERS {
        patterns = patterns
            .with_literals(*section, headers)
            .expect("built-in header literals compile");
    }
    patterns
});

/// Ordered (section, header regex) pairs.
#[derive(Debug, Clone)]
pub struct HeaderPatterns {
    patterns: Vec<(CanonicalSection, Regex)>,
}

/// A section header located in the input.
#[derive(Debug, Clone)]
struct Anchor {
    section: CanonicalSection,
    header: Range<usize>,
}

impl HeaderPatterns {
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Add a section recognized by any of the literal `headers`, case-insensitively.
    /// Headers starting with a word character must start on a word boundary.
    pub fn with_literals(self, section: CanonicalSection, headers: &[&str]) -> Result<Self> {
        let mut headers: Vec<&str> = headers
            .iter()
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .collect();
        if headers.is_empty() {
            return Err(Error::Config(format!("no headers given for {}", section)));
        }
        // Longest first so "Labs & Imaging:" wins over "Labs:" at the same offset.
        headers.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

        let alternation = headers
            .iter()
            .map(|h| {
                let boundary = if h.starts_with(is_word_char) { r"\b" } else { "" };
                format!("{}{}", boundary, regex::escape(h))
            })
            .collect::<Vec<_>>()
            .join("|");
        self.with_pattern(section, &alternation)
    }

    /// Add a section recognized by a regular expression (matched case-insensitively).
    pub fn with_pattern(mut self, section: CanonicalSection, pattern: &str) -> Result<Self> {
        if section == CanonicalSection::Uncategorized {
            return Err(Error::Config(
                "Uncategorized collects leftover text and cannot have a header".into(),
            ));
        }
        let regex = Regex::new(&format!("(?i)(?:{})", pattern))
            .map_err(|e| Error::Config(format!("invalid header pattern for {}: {}", section, e)))?;
        self.patterns.retain(|(s, _)| *s != section);
        self.patterns.push((section, regex));
        self.patterns.sort_by_key(|(s, _)| s.rank());
        Ok(self)
    }

    /// Sections that have a header pattern, in canonical order.
    pub fn sections(&self) -> impl Iterator<Item = CanonicalSection> + '_ {
        self.patterns.iter().map(|(s, _)| *s)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Cut `text` into header blocks plus `Uncategorized` leftovers, in text order.
    ///
    /// Every located header yields a unit (possibly with empty text). Sections
    /// whose header never appears yield nothing.
    pub fn segment(&self, text: &str) -> Vec<TextUnit> {
        let anchors = self.locate(text);
        let mut units = Vec::with_capacity(anchors.len() + 1);
        let mut covered_until = 0;

        for anchor in &anchors {
            let body_start = anchor.header.end;
            let body_end = self.next_header_start(text, body_start);

            if anchor.header.start > covered_until {
                push_leftover(&mut units, text, covered_until..anchor.header.start);
            }

            let body = text[body_start..body_end].trim();
            debug!(
                "Header block {} at {}..{} ({} chars)",
                anchor.section,
                body_start,
                body_end,
                body.len()
            );
            units.push(TextUnit::new(body, body_start..body_end).with_section(anchor.section));
            covered_until = body_end;
        }

        if covered_until < text.len() {
            push_leftover(&mut units, text, covered_until..text.len());
        }

        units
    }

    /// First header of every section, in text order. A header that begins
    /// inside an earlier header is dropped.
    fn locate(&self, text: &str) -> Vec<Anchor> {
        let mut found: Vec<Anchor> = self
            .patterns
            .iter()
            .filter_map(|(section, re)| {
                re.find(text).map(|m| Anchor {
                    section: *section,
                    header: m.range(),
                })
            })
            .collect();
        found.sort_by_key(|a| (a.header.start, a.section.rank()));

        let mut anchors: Vec<Anchor> = Vec::with_capacity(found.len());
        for anchor in found {
            match anchors.last() {
                Some(prev) if anchor.header.start < prev.header.end => {
                    debug!(
                        "Dropping {} header at {}: inside {} header",
                        anchor.section, anchor.header.start, prev.section
                    );
                }
                _ => anchors.push(anchor),
            }
        }
        anchors
    }

    /// Smallest offset at or after `from` where any header pattern matches.
    fn next_header_start(&self, text: &str, from: usize) -> usize {
        self.patterns
            .iter()
            .filter_map(|(_, re)| re.find_at(text, from).map(|m| m.start()))
            .min()
            .unwrap_or(text.len())
    }
}

impl Default for HeaderPatterns {
    fn default() -> Self {
        DEFAULT_PATTERNS.clone()
    }
}

fn push_leftover(units: &mut Vec<TextUnit>, text: &str, span: Range<usize>) {
    let leftover = text[span.clone()].trim();
    if !leftover.is_empty() {
        debug!("Unclaimed text at {}..{}", span.start, span.end);
        units.push(TextUnit::new(leftover, span).with_section(CanonicalSection::Uncategorized));
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(text: &str) -> Vec<(CanonicalSection, String)> {
        HeaderPatterns::default()
            .segment(text)
            .into_iter()
            .map(|u| (u.section_or_uncategorized(), u.text))
            .collect()
    }

    #[test]
    fn test_default_covers_every_headed_section() {
        let patterns = HeaderPatterns::default();
        let sections: Vec<_> = patterns.sections().collect();
        let expected: Vec<_> = CanonicalSection::headed().collect();
        assert_eq!(sections, expected);
    }

    #[test]
    fn test_basic_blocks() {
        assert_eq!(
            blocks("CC: chest pain. HPI: pain started 2 hours ago. Vitals: BP 140/90, HR 88."),
            vec![
                (CanonicalSection::ChiefComplaint, "chest pain.".to_string()),
                (CanonicalSection::Hpi, "pain started 2 hours ago.".to_string()),
                (CanonicalSection::EdVitals, "BP 140/90, HR 88.".to_string()),
            ]
        );
    }

    #[test]
    fn test_case_insensitive_headers() {
        let result = blocks("chief complaint: cough\nreview of systems: negative");
        assert_eq!(result[0], (CanonicalSection::ChiefComplaint, "cough".to_string()));
        assert_eq!(result[1], (CanonicalSection::Ros, "negative".to_string()));
    }

    #[test]
    fn test_blocks_follow_text_order_not_declaration_order() {
        let result = blocks("MDM: admit. CC: syncope.");
        assert_eq!(
            result,
            vec![
                (CanonicalSection::Mdm, "admit.".to_string()),
                (CanonicalSection::ChiefComplaint, "syncope.".to_string()),
            ]
        );
    }

    #[test]
    fn test_leading_and_trailing_text_is_uncategorized() {
        let result = blocks("Triage note 0300. CC: fall.");
        assert_eq!(
            result,
            vec![
                (CanonicalSection::Uncategorized, "Triage note 0300.".to_string()),
                (CanonicalSection::ChiefComplaint, "fall.".to_string()),
            ]
        );
    }

    #[test]
    fn test_repeated_header_ends_block_and_becomes_leftover() {
        let result = blocks("HPI: cough for 3 days. Vitals: afebrile. HPI: also sore throat.");
        assert_eq!(
            result,
            vec![
                (CanonicalSection::Hpi, "cough for 3 days.".to_string()),
                (CanonicalSection::EdVitals, "afebrile.".to_string()),
                (CanonicalSection::Uncategorized, "HPI: also sore throat.".to_string()),
            ]
        );
    }

    #[test]
    fn test_block_ends_at_nearest_header_of_any_section() {
        // ROS is declared before Labs but appears after it in the text.
        let result = blocks("Labs: WBC 12. ROS: negative. Exam: normal.");
        assert_eq!(
            result,
            vec![
                (CanonicalSection::LabsImaging, "WBC 12.".to_string()),
                (CanonicalSection::Ros, "negative.".to_string()),
                (CanonicalSection::PhysicalExam, "normal.".to_string()),
            ]
        );
    }

    #[test]
    fn test_longer_header_wins_at_same_offset() {
        let result = blocks("Labs & Imaging: CXR clear.");
        assert_eq!(result, vec![(CanonicalSection::LabsImaging, "CXR clear.".to_string())]);
    }

    #[test]
    fn test_header_requires_word_boundary() {
        // "ACC:" must not be read as "CC:".
        let result = blocks("ACC: 3 units");
        assert_eq!(result, vec![(CanonicalSection::Uncategorized, "ACC: 3 units".to_string())]);
    }

    #[test]
    fn test_empty_block_is_kept() {
        let units = HeaderPatterns::default().segment("CC: HPI: vomiting.");
        assert_eq!(units[0].section, Some(CanonicalSection::ChiefComplaint));
        assert_eq!(units[0].text, "");
        assert_eq!(units[1].text, "vomiting.");
    }

    #[test]
    fn test_no_headers_is_single_leftover() {
        let result = blocks("Patient well appearing.");
        assert_eq!(
            result,
            vec![(CanonicalSection::Uncategorized, "Patient well appearing.".to_string())]
        );
    }

    #[test]
    fn test_custom_pattern_replaces_section() {
        let patterns = HeaderPatterns::empty()
            .with_pattern(CanonicalSection::Mdm, r"#+\s*plan")
            .unwrap();
        let units = patterns.segment("## Plan\nadmit to tele");
        assert_eq!(units[0].section, Some(CanonicalSection::Mdm));
        assert_eq!(units[0].text, "admit to tele");
    }

    #[test]
    fn test_uncategorized_header_rejected() {
        let err = HeaderPatterns::empty()
            .with_pattern(CanonicalSection::Uncategorized, "Other:")
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(HeaderPatterns::empty()
            .with_pattern(CanonicalSection::Hpi, "(")
            .is_err());
    }
}
