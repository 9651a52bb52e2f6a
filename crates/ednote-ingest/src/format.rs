//! Formatting pipeline: raw text → [`StructuredNote`].

use tracing::{debug, info, warn};

use ednote_core::{
    AbbreviationTable, CanonicalSection, Error, FormatWarning, Result, SegmentMode,
    StructuredNote, TextUnit,
};

use crate::assemble::assemble;
use crate::classify::SectionClassifier;
use crate::normalize::Normalizer;
use crate::segment::{HeaderPatterns, Segmenter, SentenceRules};

/// Segmentation and classification configuration for the pipeline.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    sentence_rules: SentenceRules,
    header_patterns: HeaderPatterns,
    classifier: SectionClassifier,
}

impl Formatter {
    pub fn new(
        sentence_rules: SentenceRules,
        header_patterns: HeaderPatterns,
        classifier: SectionClassifier,
    ) -> Self {
        Self {
            sentence_rules,
            header_patterns,
            classifier,
        }
    }

    pub fn with_classifier(mut self, classifier: SectionClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_header_patterns(mut self, header_patterns: HeaderPatterns) -> Self {
        self.header_patterns = header_patterns;
        self
    }

    pub fn with_sentence_rules(mut self, sentence_rules: SentenceRules) -> Self {
        self.sentence_rules = sentence_rules;
        self
    }

    pub fn classifier(&self) -> &SectionClassifier {
        &self.classifier
    }

    pub fn segmenter(&self, mode: SegmentMode) -> Segmenter<'_> {
        match mode {
            SegmentMode::Sentence => Segmenter::Sentence(&self.sentence_rules),
            SegmentMode::Header => Segmenter::Header(&self.header_patterns),
        }
    }

    /// Format `text` using `abbreviations` for normalization.
    pub fn format(
        &self,
        text: &str,
        abbreviations: &AbbreviationTable,
        mode: SegmentMode,
    ) -> Result<StructuredNote> {
        self.format_with(text, &Normalizer::new(abbreviations), mode)
    }

    /// Format `text` with a prebuilt normalizer.
    pub fn format_with(
        &self,
        text: &str,
        normalizer: &Normalizer,
        mode: SegmentMode,
    ) -> Result<StructuredNote> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let units: Vec<TextUnit> = self
            .segmenter(mode)
            .segment(text)
            .map(|unit| self.classify_unit(unit))
            .collect();
        let unit_count = units.len();
        let headed = units.iter().any(|u| {
            u.section
                .is_some_and(|s| s != CanonicalSection::Uncategorized)
        });

        let mut note = assemble(units, mode == SegmentMode::Header);
        if mode == SegmentMode::Header && !headed {
            warn!("No section headers found in {} chars of input", text.len());
            note.push_warning(FormatWarning::NoSectionsFound);
        }

        normalizer.normalize_note(&mut note);

        info!(
            "Formatted note: mode={}, units={}, sections={}",
            mode,
            unit_count,
            note.present().count()
        );
        Ok(note)
    }

    fn classify_unit(&self, mut unit: TextUnit) -> TextUnit {
        if unit.section.is_none() {
            let section = self.classifier.classify(&unit.text);
            debug!(
                "Unit {}..{} classified as {}",
                unit.span.start, unit.span.end, section
            );
            unit.section = Some(section);
        }
        unit
    }
}

/// Format `text` with the built-in vocabulary.
pub fn format(
    text: &str,
    abbreviations: &AbbreviationTable,
    mode: SegmentMode,
) -> Result<StructuredNote> {
    Formatter::default().format(text, abbreviations, mode)
}
