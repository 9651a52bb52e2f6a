//! Segmentation: cut raw note text into ordered [`TextUnit`]s.
//!
//! Two strategies share one interface:
//! - sentence mode: whitespace tokenization, sentences closed on `.`/`!`/`?`
//!   unless the word is a known title abbreviation (`Dr.`, `Mrs.`, ...);
//! - header mode: blocks anchored on the first occurrence of each section
//!   header, with unclaimed text collected as `Uncategorized`.

pub mod header;
pub mod sentence;

use ednote_core::{SegmentMode, TextUnit};

pub use header::HeaderPatterns;
pub use sentence::{SentenceRules, SentenceUnits};

/// A segmentation strategy bound to its configuration.
#[derive(Debug, Clone, Copy)]
pub enum Segmenter<'c> {
    Sentence(&'c SentenceRules),
    Header(&'c HeaderPatterns),
}

impl<'c> Segmenter<'c> {
    pub fn mode(&self) -> SegmentMode {
        match self {
            Segmenter::Sentence(_) => SegmentMode::Sentence,
            Segmenter::Header(_) => SegmentMode::Header,
        }
    }

    /// Split `text` into units. Sentence units are produced lazily and left
    /// unclassified; header units already carry their section.
    pub fn segment<'t>(&self, text: &'t str) -> Segments<'t>
    where
        'c: 't,
    {
        match *self {
            Segmenter::Sentence(rules) => Segments::Sentences(SentenceUnits::new(text, rules)),
            Segmenter::Header(patterns) => Segments::Blocks(patterns.segment(text).into_iter()),
        }
    }
}

/// Ordered, single-pass stream of units from either strategy.
pub enum Segments<'t> {
    Sentences(SentenceUnits<'t>),
    Blocks(std::vec::IntoIter<TextUnit>),
}

impl Iterator for Segments<'_> {
    type Item = TextUnit;

    fn next(&mut self) -> Option<TextUnit> {
        match self {
            Segments::Sentences(units) => units.next(),
            Segments::Blocks(units) => units.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ednote_core::CanonicalSection;

    #[test]
    fn test_sentence_mode_units_are_unclassified() {
        let rules = SentenceRules::default();
        let segmenter = Segmenter::Sentence(&rules);
        assert_eq!(segmenter.mode(), SegmentMode::Sentence);
        let units: Vec<_> = segmenter.segment("Chest pain. Denies fever.").collect();
        assert_eq!(units.len(), 2);
        assert!(units.iter().all(|u| u.section.is_none()));
    }

    #[test]
    fn test_header_mode_units_carry_sections() {
        let patterns = HeaderPatterns::default();
        let segmenter = Segmenter::Header(&patterns);
        assert_eq!(segmenter.mode(), SegmentMode::Header);
        let units: Vec<_> = segmenter.segment("CC: cough. MDM: likely viral.").collect();
        let sections: Vec<_> = units.iter().map(|u| u.section).collect();
        assert_eq!(
            sections,
            vec![Some(CanonicalSection::ChiefComplaint), Some(CanonicalSection::Mdm)]
        );
    }
}
