//! Sentence segmentation without lookbehind.
//!
//! Words are whitespace-delimited; a sentence closes on the first word ending
//! in a terminator that is not a known abbreviation. Unit text is the
//! sentence's words joined by single spaces.

use std::collections::HashSet;
use std::iter::FusedIterator;

use ednote_core::TextUnit;

/// Words that end in a period without closing a sentence.
pub const DEFAULT_ABBREVIATION_EXCEPTIONS: &[&str] =
    &["Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "Sr.", "Jr."];

pub const DEFAULT_TERMINATORS: &[char] = &['.', '!', '?'];

/// Sentence boundary configuration.
#[derive(Debug, Clone)]
pub struct SentenceRules {
    terminators: Vec<char>,
    exceptions: HashSet<String>,
}

impl SentenceRules {
    pub fn new<I, S>(terminators: &[char], exceptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terminators: terminators.to_vec(),
            exceptions: exceptions.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive membership (`Dr.` is an exception, `DR.` is not).
    pub fn is_exception(&self, word: &str) -> bool {
        self.exceptions.contains(word)
    }

    /// Whether `word` ends the current sentence.
    pub fn closes_sentence(&self, word: &str) -> bool {
        word.ends_with(self.terminators.as_slice()) && !self.is_exception(word)
    }
}

impl Default for SentenceRules {
    fn default() -> Self {
        Self::new(
            DEFAULT_TERMINATORS,
            DEFAULT_ABBREVIATION_EXCEPTIONS.iter().copied(),
        )
    }
}

/// Lazy iterator over the sentences of a text.
pub struct SentenceUnits<'t> {
    text: &'t str,
    pos: usize,
    rules: &'t SentenceRules,
}

impl<'t> SentenceUnits<'t> {
    pub fn new(text: &'t str, rules: &'t SentenceRules) -> Self {
        Self {
            text,
            pos: 0,
            rules,
        }
    }

    /// Byte range of the next whitespace-delimited word.
    fn next_word(&mut self) -> Option<(usize, usize)> {
        let rest = &self.text[self.pos..];
        let Some(offset) = rest.find(|c: char| !c.is_whitespace()) else {
            self.pos = self.text.len();
            return None;
        };
        let start = self.pos + offset;
        let len = self.text[start..]
            .find(char::is_whitespace)
            .unwrap_or(self.text.len() - start);
        self.pos = start + len;
        Some((start, start + len))
    }
}

impl Iterator for SentenceUnits<'_> {
    type Item = TextUnit;

    fn next(&mut self) -> Option<TextUnit> {
        let mut words: Vec<&str> = Vec::new();
        let mut span: Option<(usize, usize)> = None;

        while let Some((start, end)) = self.next_word() {
            let word = &self.text[start..end];
            words.push(word);
            span = Some((span.map_or(start, |(s, _)| s), end));
            if self.rules.closes_sentence(word) {
                break;
            }
        }

        let (start, end) = span?;
        Some(TextUnit::new(words.join(" "), start..end))
    }
}

impl FusedIterator for SentenceUnits<'_> {}
