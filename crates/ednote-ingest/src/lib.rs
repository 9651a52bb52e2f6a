//! ednote ingest: raw ED note text → section-labeled structured note.
//!
//! Pipeline: segment → classify → assemble → normalize.

pub mod assemble;
pub mod classify;
pub mod format;
pub mod normalize;
pub mod segment;

pub use assemble::{assemble, PARAGRAPH_SEPARATOR};
pub use classify::{SectionClassifier, SectionRule, Trigger};
pub use format::{format, Formatter};
pub use normalize::Normalizer;
pub use segment::{HeaderPatterns, Segmenter, Segments, SentenceRules, SentenceUnits};
